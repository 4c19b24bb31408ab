use crate::error::{LookupError, Result};
use bitebot_catalog::CatalogConfig;
use bitebot_reference::{DEFAULT_REFERENCE_DATA, REFERENCE_DATA_ENV};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an optional TOML config file
pub const CONFIG_ENV: &str = "BITEBOT_CONFIG";
pub const CATALOG_URL_ENV: &str = "BITEBOT_CATALOG_URL";
pub const CATALOG_TIMEOUT_ENV: &str = "BITEBOT_CATALOG_TIMEOUT_SECS";

pub const DEFAULT_LIMIT: usize = 10;

/// Lookup configuration.
///
/// Layered as defaults, then an optional TOML file, then environment
/// overrides; callers apply flag overrides last.
///
/// ```toml
/// reference_data = "data/usda/foundation_foods.json"
/// default_limit = 10
///
/// [catalog]
/// base_url = "https://world.openfoodfacts.org"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Location of the bundled reference dataset
    pub reference_data: PathBuf,

    pub catalog: CatalogConfig,

    /// Per-source result limit when the caller gives none
    pub default_limit: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            reference_data: PathBuf::from(DEFAULT_REFERENCE_DATA),
            catalog: CatalogConfig::default(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl LookupConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Defaults, overlaid by `file` (or `BITEBOT_CONFIG`) and then the process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `var`
    pub fn apply_env_with<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var(REFERENCE_DATA_ENV) {
            self.reference_data = PathBuf::from(path);
        }
        if let Some(url) = var(CATALOG_URL_ENV) {
            self.set_catalog_url(url);
        }
        if let Some(secs) = var(CATALOG_TIMEOUT_ENV) {
            self.catalog.timeout_secs = secs.trim().parse().map_err(|_| {
                LookupError::Config(format!("{CATALOG_TIMEOUT_ENV}='{secs}' is not a number"))
            })?;
        }
        Ok(())
    }

    /// Point every catalog host at `url`, keeping timeout and client header
    pub fn set_catalog_url(&mut self, url: impl Into<String>) {
        self.catalog = CatalogConfig {
            timeout_secs: self.catalog.timeout_secs,
            user_agent: std::mem::take(&mut self.catalog.user_agent),
            ..CatalogConfig::with_base_url(url)
        };
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(LookupError::Config("default_limit must be > 0".to_string()));
        }
        if self.reference_data.as_os_str().is_empty() {
            return Err(LookupError::Config(
                "reference_data must not be empty".to_string(),
            ));
        }
        self.catalog.validate().map_err(LookupError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = LookupConfig::from_toml_str(
            r#"
            default_limit = 5

            [catalog]
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.catalog.timeout_secs, 3);
        assert_eq!(config.catalog.base_url, "https://world.openfoodfacts.org");
        assert_eq!(config.reference_data, PathBuf::from(DEFAULT_REFERENCE_DATA));
    }

    #[test]
    fn mistyped_toml_is_an_error() {
        assert!(matches!(
            LookupConfig::from_toml_str("default_limit = \"many\""),
            Err(LookupError::Toml(_))
        ));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitebot.toml");
        std::fs::write(&path, "reference_data = \"/srv/foods.json\"\n").unwrap();
        let config = LookupConfig::from_file(&path).unwrap();
        assert_eq!(config.reference_data, PathBuf::from("/srv/foods.json"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (REFERENCE_DATA_ENV, "/tmp/foods.json"),
            (CATALOG_URL_ENV, "http://127.0.0.1:8080"),
            (CATALOG_TIMEOUT_ENV, "4"),
        ]
        .into_iter()
        .collect();

        let mut config = LookupConfig::default();
        config
            .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.reference_data, PathBuf::from("/tmp/foods.json"));
        assert_eq!(config.catalog.host_for(Some("germany")), "http://127.0.0.1:8080/de");
        assert_eq!(config.catalog.timeout_secs, 4);
    }

    #[test]
    fn catalog_url_override_keeps_timeout() {
        let mut config = LookupConfig::default();
        config.catalog.timeout_secs = 2;
        config.set_catalog_url("http://localhost:9000/");
        assert_eq!(config.catalog.base_url, "http://localhost:9000");
        assert_eq!(config.catalog.timeout_secs, 2);
        assert_eq!(config.catalog.user_agent, "BiteBot/1.0 (nutrition-tracker)");
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut config = LookupConfig::default();
        config
            .apply_env_with(|_| Some("  ".to_string()))
            .unwrap();
        assert_eq!(config, LookupConfig::default());
    }

    #[test]
    fn bad_timeout_in_environment_is_reported() {
        let mut config = LookupConfig::default();
        let err = config
            .apply_env_with(|key| (key == CATALOG_TIMEOUT_ENV).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(CATALOG_TIMEOUT_ENV));
    }

    #[test]
    fn validate_rejects_zero_limit_and_timeout() {
        assert!(LookupConfig::default().validate().is_ok());

        let mut config = LookupConfig {
            default_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.default_limit = 3;
        config.catalog.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
