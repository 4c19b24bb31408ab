use crate::error::{ReferenceError, Result};
use crate::index::ReferenceIndex;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Environment variable overriding the dataset location
pub const REFERENCE_DATA_ENV: &str = "BITEBOT_REFERENCE_DATA";

pub const DEFAULT_REFERENCE_DATA: &str = "data/usda/foundation_foods.json";

/// Handles shared by every caller in the process, one per dataset path
static SHARED: Lazy<Mutex<HashMap<PathBuf, Arc<ReferenceDataset>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Lazily loaded, never mutated reference dataset.
///
/// The first [`load`](Self::load) reads the file; concurrent first callers
/// block until that single load finishes. The outcome, success or failure,
/// is kept for the lifetime of the handle.
#[derive(Debug)]
pub struct ReferenceDataset {
    path: PathBuf,
    cell: OnceCell<std::result::Result<ReferenceIndex, String>>,
}

impl ReferenceDataset {
    /// Handle for `path`; nothing is read until first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Handle over an index that is already in memory
    pub fn from_index(index: ReferenceIndex) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            cell: OnceCell::with_value(Ok(index)),
        }
    }

    /// The process-wide handle for `path`. Every call with the same path
    /// returns the same handle, so the file is loaded at most once.
    pub fn shared(path: impl AsRef<Path>) -> Arc<Self> {
        let path = path.as_ref().to_path_buf();
        let mut handles = SHARED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        handles
            .entry(path.clone())
            .or_insert_with(|| Arc::new(Self::new(path)))
            .clone()
    }

    /// The process-wide handle for the configured location
    /// (`BITEBOT_REFERENCE_DATA`, else [`DEFAULT_REFERENCE_DATA`]).
    pub fn process_wide() -> Arc<Self> {
        let path = std::env::var_os(REFERENCE_DATA_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_DATA));
        Self::shared(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load on first call; later calls return the memoized outcome.
    pub fn load(&self) -> Result<&ReferenceIndex> {
        let outcome = self.cell.get_or_init(|| {
            ReferenceIndex::from_path(&self.path).map_err(|err| {
                log::error!(
                    "Reference dataset {} failed to load: {err}",
                    self.path.display()
                );
                err.to_string()
            })
        });
        outcome
            .as_ref()
            .map_err(|reason| ReferenceError::DatasetUnavailable {
                path: self.path.clone(),
                reason: reason.clone(),
            })
    }

    /// Whether a load has been attempted
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
