use crate::country::country_code;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_REGIONAL_URL_TEMPLATE: &str = "https://{code}.openfoodfacts.org";
pub const DEFAULT_USER_AGENT: &str = "BiteBot/1.0 (nutrition-tracker)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the remote catalog client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Host used when no country is requested
    pub base_url: String,

    /// Regional host; `{code}` is replaced by the country code
    pub regional_url_template: String,

    /// Identifying client header sent with every request
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            regional_url_template: DEFAULT_REGIONAL_URL_TEMPLATE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CatalogConfig {
    /// Config pointing both hosts at `base_url` (regional hosts become `{base_url}/{code}`)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            regional_url_template: format!("{base_url}/{{code}}"),
            base_url,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host for an optional country filter, without a trailing slash
    #[must_use]
    pub fn host_for(&self, country: Option<&str>) -> String {
        let host = match country.map(str::trim).filter(|c| !c.is_empty()) {
            Some(country) => self
                .regional_url_template
                .replace("{code}", &country_code(country)),
            None => self.base_url.clone(),
        };
        host.trim_end_matches('/').to_string()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("catalog timeout_secs must be > 0".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("catalog base_url must not be empty".to_string());
        }
        if !self.regional_url_template.contains("{code}") {
            return Err(format!(
                "catalog regional_url_template '{}' must contain {{code}}",
                self.regional_url_template
            ));
        }
        Ok(())
    }
}
