use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::model::CatalogProduct;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

/// Fields requested from the search endpoint
pub const SEARCH_FIELDS: &str =
    "code,product_name,brands,quantity,nutriments,nutriscore_grade,categories_tags";

/// Remote catalog operations the aggregator depends on
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Exact product for `code`, or `None` when the catalog does not know it
    async fn fetch_by_barcode(&self, code: &str) -> Result<Option<CatalogProduct>>;

    /// Up to `limit` products matching `query`, optionally from a regional host
    async fn search_by_text(
        &self,
        query: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<CatalogProduct>>;
}

/// HTTP client for the product catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

fn validate_barcode(code: &str) -> Result<&str> {
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(CatalogError::InvalidBarcode(code.to_string()));
    }
    Ok(code)
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        config.validate().map_err(CatalogError::Client)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|err| CatalogError::Client(err.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn classify(&self, err: &reqwest::Error) -> CatalogError {
        if err.is_timeout() {
            CatalogError::Timeout(self.config.timeout_secs)
        } else {
            CatalogError::Network(err.to_string())
        }
    }

    /// One bounded GET. `Ok(None)` on 404.
    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Option<Value>> {
        log::debug!("GET {url} {params:?}");
        let mut request = self.http.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(|err| self.classify(&err))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|err| self.classify(&err))?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }

    pub async fn fetch_by_barcode(&self, code: &str) -> Result<Option<CatalogProduct>> {
        let code = validate_barcode(code)?;
        let url = format!("{}/api/v2/product/{code}.json", self.config.host_for(None));

        let Some(body) = self.get_json(&url, &[]).await? else {
            log::info!("Barcode {code} not found in catalog");
            return Ok(None);
        };
        let Value::Object(mut body) = body else {
            return Err(CatalogError::Decode("expected a JSON object".to_string()));
        };

        let found = body.get("status").and_then(Value::as_i64) == Some(1);
        match body.remove("product") {
            Some(product) if found => CatalogProduct::from_json(product)
                .map(Some)
                .map_err(|err| CatalogError::Decode(err.to_string())),
            _ => {
                log::info!("Barcode {code} not found in catalog");
                Ok(None)
            }
        }
    }

    pub async fn search_by_text(
        &self,
        query: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<CatalogProduct>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}/cgi/search.pl", self.config.host_for(country));
        let params = [
            ("search_terms", query.to_string()),
            ("search_simple", "1".to_string()),
            ("action", "process".to_string()),
            ("json", "1".to_string()),
            ("page_size", limit.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];

        let Some(body) = self.get_json(&url, &params).await? else {
            return Ok(Vec::new());
        };
        let items = match body {
            Value::Object(mut body) => match body.remove("products") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) => Vec::new(),
                Some(_) => {
                    return Err(CatalogError::Decode("'products' is not an array".to_string()))
                }
            },
            _ => return Err(CatalogError::Decode("expected a JSON object".to_string())),
        };

        let mut products = Vec::with_capacity(items.len().min(limit));
        for item in items {
            match CatalogProduct::from_json(item) {
                Ok(product) => products.push(product),
                Err(err) => log::debug!("Dropping malformed catalog product: {err}"),
            }
        }
        products.truncate(limit);

        log::debug!("Catalog search '{query}': {} products", products.len());
        Ok(products)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_by_barcode(&self, code: &str) -> Result<Option<CatalogProduct>> {
        CatalogClient::fetch_by_barcode(self, code).await
    }

    async fn search_by_text(
        &self,
        query: &str,
        limit: usize,
        country: Option<&str>,
    ) -> Result<Vec<CatalogProduct>> {
        CatalogClient::search_by_text(self, query, limit, country).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcodes_must_be_digits() {
        assert_eq!(validate_barcode(" 3017620422003 ").unwrap(), "3017620422003");
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("30176/../x").is_err());
    }

    #[test]
    fn client_rejects_invalid_config() {
        let config = CatalogConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            CatalogClient::new(config),
            Err(CatalogError::Client(_))
        ));
    }
}
