use crate::config::LookupConfig;
use crate::error::{LookupError, Result};
use crate::result::{SearchResult, Source};
use bitebot_catalog::{CatalogClient, CatalogSource};
use bitebot_reference::ReferenceDataset;
use bitebot_search::SearchQuery;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Restricts a search to one source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFilter {
    Reference,
    Catalog,
}

impl SourceFilter {
    const fn includes(filter: Option<Self>, source: Source) -> bool {
        match (filter, source) {
            (None, _) => true,
            (Some(Self::Reference), Source::Reference) => true,
            (Some(Self::Catalog), Source::Catalog) => true,
            _ => false,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usda" | "reference" => Ok(Self::Reference),
            "off" | "catalog" => Ok(Self::Catalog),
            other => Err(LookupError::Config(format!(
                "unknown source '{other}' (expected usda or off)"
            ))),
        }
    }
}

/// Outcome of querying one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SourceStatus {
    Matched(usize),
    NoMatches,
    /// The source could not be queried; the message is the cause
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: Source,
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SourceStatus::Matched(n) => write!(f, "{}: {n} result(s)", self.source),
            SourceStatus::NoMatches => write!(f, "{}: no matches", self.source),
            SourceStatus::Failed(reason) => write!(f, "{} unavailable: {reason}", self.source),
        }
    }
}

/// Merged results, reference first, plus one report per queried source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub reports: Vec<SourceReport>,
}

impl SearchOutcome {
    /// Reports for sources that failed
    pub fn warnings(&self) -> impl Iterator<Item = &SourceReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, SourceStatus::Failed(_)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Reference-first lookup across the local index and the remote catalog
pub struct NutritionLookup<C = CatalogClient> {
    reference: Arc<ReferenceDataset>,
    catalog: C,
}

impl NutritionLookup<CatalogClient> {
    /// Lookup over the process-wide dataset handle for the configured path
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        config.validate()?;
        let catalog = CatalogClient::new(config.catalog.clone())?;
        Ok(Self::new(
            ReferenceDataset::shared(&config.reference_data),
            catalog,
        ))
    }
}

impl<C: CatalogSource> NutritionLookup<C> {
    pub fn new(reference: Arc<ReferenceDataset>, catalog: C) -> Self {
        Self { reference, catalog }
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceDataset {
        &self.reference
    }

    /// Search both sources (or the filtered one), bounded per source.
    ///
    /// A failing source does not fail the call; it is recorded in
    /// [`SearchOutcome::reports`] and the other source's results are kept.
    pub async fn search_all(
        &self,
        query: &str,
        limit_per_source: usize,
        filter: Option<SourceFilter>,
        country: Option<&str>,
    ) -> Result<SearchOutcome> {
        SearchQuery::parse(query)?;

        let mut results = Vec::new();
        let mut reports = Vec::new();

        if SourceFilter::includes(filter, Source::Reference) {
            let found = self.search_reference(query, limit_per_source);
            reports.push(settle(Source::Reference, found, &mut results));
        }
        if SourceFilter::includes(filter, Source::Catalog) {
            let found: Result<Vec<SearchResult>> = self
                .catalog
                .search_by_text(query, limit_per_source, country)
                .await
                .map(|products| products.into_iter().map(SearchResult::from_catalog).collect())
                .map_err(LookupError::from);
            reports.push(settle(Source::Catalog, found, &mut results));
        }

        log::debug!(
            "search_all '{query}' (limit {limit_per_source}): {} result(s)",
            results.len()
        );
        Ok(SearchOutcome { results, reports })
    }

    fn search_reference(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let index = self.reference.load()?;
        Ok(index
            .search(query, limit)?
            .into_iter()
            .map(|m| SearchResult::from_reference(m.food))
            .collect())
    }

    /// Exact reference record by id
    pub fn lookup_by_id(&self, id: u64) -> Result<Option<SearchResult>> {
        let index = self.reference.load()?;
        Ok(index.find_by_id(id).map(SearchResult::from_reference))
    }

    /// Exact catalog product by barcode
    pub async fn lookup_barcode(&self, code: &str) -> Result<Option<SearchResult>> {
        let product = self.catalog.fetch_by_barcode(code).await?;
        Ok(product.map(SearchResult::from_catalog))
    }
}

fn settle(
    source: Source,
    found: Result<Vec<SearchResult>>,
    results: &mut Vec<SearchResult>,
) -> SourceReport {
    let status = match found {
        Ok(found) if found.is_empty() => SourceStatus::NoMatches,
        Ok(found) => {
            let n = found.len();
            results.extend(found);
            SourceStatus::Matched(n)
        }
        Err(err) => {
            log::warn!("{source} search failed: {err}");
            SourceStatus::Failed(err.to_string())
        }
    };
    SourceReport { source, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::SourceKey;
    use async_trait::async_trait;
    use bitebot_catalog::{CatalogError, CatalogProduct};
    use bitebot_reference::ReferenceIndex;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    const DATASET: &str = r#"[
        {"fdcId": 1, "description": "Yogurt, plain, whole milk",
         "foodNutrients": [{"nutrient": {"name": "Protein", "unitName": "G"}, "amount": 3.5}]},
        {"fdcId": 2, "description": "Yogurt, greek, plain, nonfat"},
        {"fdcId": 3, "description": "Bread, rye"}
    ]"#;

    #[derive(Default)]
    struct FakeCatalog {
        products: Vec<CatalogProduct>,
        failure: Option<CatalogError>,
        countries: Mutex<Vec<Option<String>>>,
    }

    impl FakeCatalog {
        fn with_products(names: &[&str]) -> Self {
            let products = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    CatalogProduct::from_json(json!({"code": format!("400000000000{i}"), "product_name": name}))
                        .unwrap()
                })
                .collect();
            Self {
                products,
                ..Default::default()
            }
        }

        fn failing(err: CatalogError) -> Self {
            Self {
                failure: Some(err),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn fetch_by_barcode(
            &self,
            code: &str,
        ) -> bitebot_catalog::Result<Option<CatalogProduct>> {
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            Ok(self.products.iter().find(|p| p.barcode == code).cloned())
        }

        async fn search_by_text(
            &self,
            _query: &str,
            limit: usize,
            country: Option<&str>,
        ) -> bitebot_catalog::Result<Vec<CatalogProduct>> {
            self.countries
                .lock()
                .unwrap()
                .push(country.map(str::to_string));
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            Ok(self.products.iter().take(limit).cloned().collect())
        }
    }

    fn reference() -> Arc<ReferenceDataset> {
        Arc::new(ReferenceDataset::from_index(
            ReferenceIndex::from_json_str(DATASET).unwrap(),
        ))
    }

    fn missing_reference() -> Arc<ReferenceDataset> {
        let dir = tempfile::tempdir().unwrap();
        Arc::new(ReferenceDataset::new(dir.path().join("absent.json")))
    }

    #[tokio::test]
    async fn reference_results_come_first() {
        let lookup = NutritionLookup::new(
            reference(),
            FakeCatalog::with_products(&["Yogurt drink", "Yogurt cup"]),
        );
        let outcome = lookup.search_all("yogurt", 5, None, None).await.unwrap();

        let sources: Vec<Source> = outcome.results.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![Source::Reference, Source::Reference, Source::Catalog, Source::Catalog]
        );
        assert_eq!(
            outcome.reports,
            vec![
                SourceReport { source: Source::Reference, status: SourceStatus::Matched(2) },
                SourceReport { source: Source::Catalog, status: SourceStatus::Matched(2) },
            ]
        );
        assert_eq!(outcome.warnings().count(), 0);
    }

    #[tokio::test]
    async fn limit_applies_per_source() {
        let lookup = NutritionLookup::new(
            reference(),
            FakeCatalog::with_products(&["Yogurt drink", "Yogurt cup", "Yogurt tub"]),
        );
        let outcome = lookup.search_all("yogurt", 1, None, None).await.unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].key, SourceKey::Reference(1));
    }

    #[tokio::test]
    async fn catalog_failure_keeps_reference_results() {
        let lookup = NutritionLookup::new(
            reference(),
            FakeCatalog::failing(CatalogError::Timeout(10)),
        );
        let outcome = lookup.search_all("rye", 5, None, None).await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].name, "Bread, rye");
        let warnings: Vec<_> = outcome.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, Source::Catalog);
    }

    #[tokio::test]
    async fn reference_failure_keeps_catalog_results() {
        let lookup = NutritionLookup::new(
            missing_reference(),
            FakeCatalog::with_products(&["Rye crackers"]),
        );
        let outcome = lookup.search_all("rye", 5, None, None).await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].source, Source::Catalog);
        assert!(matches!(
            outcome.reports[0].status,
            SourceStatus::Failed(ref reason) if reason.contains("unavailable")
        ));
    }

    #[tokio::test]
    async fn both_failing_yields_empty_outcome_with_two_warnings() {
        let lookup = NutritionLookup::new(
            missing_reference(),
            FakeCatalog::failing(CatalogError::Network("refused".to_string())),
        );
        let outcome = lookup.search_all("rye", 5, None, None).await.unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.warnings().count(), 2);
    }

    #[tokio::test]
    async fn zero_matches_is_not_a_failure() {
        let lookup = NutritionLookup::new(reference(), FakeCatalog::default());
        let outcome = lookup.search_all("quinoa", 5, None, None).await.unwrap();
        assert!(outcome.is_empty());
        assert!(outcome
            .reports
            .iter()
            .all(|r| r.status == SourceStatus::NoMatches));
    }

    #[tokio::test]
    async fn filter_restricts_sources_and_country_is_forwarded() {
        let catalog = FakeCatalog::with_products(&["Yogurt drink"]);
        let lookup = NutritionLookup::new(reference(), catalog);

        let local = lookup
            .search_all("yogurt", 5, Some(SourceFilter::Reference), Some("germany"))
            .await
            .unwrap();
        assert!(local.results.iter().all(|r| r.source == Source::Reference));
        assert_eq!(local.reports.len(), 1);

        let remote = lookup
            .search_all("yogurt", 5, Some(SourceFilter::Catalog), Some("germany"))
            .await
            .unwrap();
        assert!(remote.results.iter().all(|r| r.source == Source::Catalog));
        assert_eq!(
            *lookup.catalog.countries.lock().unwrap(),
            vec![Some("germany".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let lookup = NutritionLookup::new(reference(), FakeCatalog::default());
        assert!(matches!(
            lookup.search_all(" , ", 5, None, None).await,
            Err(LookupError::Search(_))
        ));
        assert!(lookup.catalog.countries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn exact_lookups_bypass_ranking() {
        let lookup = NutritionLookup::new(
            reference(),
            FakeCatalog::with_products(&["Yogurt drink"]),
        );
        let food = lookup.lookup_by_id(1).unwrap().unwrap();
        assert_eq!(food.per_100g.protein_g(), Some(3.5));
        assert_eq!(lookup.lookup_by_id(42).unwrap(), None);

        let product = lookup.lookup_barcode("4000000000000").await.unwrap().unwrap();
        assert_eq!(product.name, "Yogurt drink");
        assert_eq!(lookup.lookup_barcode("4999999999999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn exact_lookups_surface_source_errors() {
        let lookup = NutritionLookup::new(
            missing_reference(),
            FakeCatalog::failing(CatalogError::Status(503)),
        );
        assert!(matches!(lookup.lookup_by_id(1), Err(LookupError::Reference(_))));
        assert!(matches!(
            lookup.lookup_barcode("1").await,
            Err(LookupError::Catalog(CatalogError::Status(503)))
        ));
    }

    #[test]
    fn source_filter_aliases() {
        assert_eq!("usda".parse::<SourceFilter>().unwrap(), SourceFilter::Reference);
        assert_eq!("OFF".parse::<SourceFilter>().unwrap(), SourceFilter::Catalog);
        assert_eq!("catalog".parse::<SourceFilter>().unwrap(), SourceFilter::Catalog);
        assert!("both".parse::<SourceFilter>().is_err());
    }
}
