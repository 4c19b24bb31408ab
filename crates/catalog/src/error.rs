use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog request timed out after {0}s")]
    Timeout(u64),

    #[error("Catalog unreachable: {0}")]
    Network(String),

    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),

    #[error("Invalid barcode '{0}': expected digits only")]
    InvalidBarcode(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
