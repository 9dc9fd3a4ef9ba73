//! Dataset sources
//!
//! Reading a dataset from disk belongs to the I/O layer. The query side only
//! needs something that hands over a validated [`Dataset`] when a database is
//! opened.

use crate::dataset::Dataset;
use crate::error::Result;

/// Provider of a loaded dataset.
pub trait DatasetSource: Send + Sync {
    /// Load the dataset. Called every time a database is opened.
    fn read(&self) -> Result<Dataset>;
}

/// Source backed by a dataset already held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    dataset: Dataset,
}

impl MemorySource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl DatasetSource for MemorySource {
    fn read(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }
}

impl From<Dataset> for MemorySource {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}
