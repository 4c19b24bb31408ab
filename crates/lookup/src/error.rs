use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Reference(#[from] bitebot_reference::ReferenceError),

    #[error(transparent)]
    Catalog(#[from] bitebot_catalog::CatalogError),

    #[error(transparent)]
    Nutrient(#[from] bitebot_nutrients::NutrientError),

    #[error(transparent)]
    Search(#[from] bitebot_search::SearchError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
