use crate::catalog::{CatalogError, ClassCatalog};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<CatalogError> for PersistenceError {
    fn from(value: CatalogError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Snapshot format written by every backend.
pub const SNAPSHOT_VERSION: u32 = 1;

pub trait CatalogStore {
    fn save_catalog(&self, catalog: &ClassCatalog) -> PersistenceResult<()>;
    fn load_catalog(&self) -> PersistenceResult<Option<ClassCatalog>>;
}

pub fn validate_catalog(catalog: &ClassCatalog) -> PersistenceResult<()> {
    catalog.validate().map_err(PersistenceError::from)
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_catalog_from_csv, load_catalog_from_json, save_catalog_to_csv, save_catalog_to_json,
};
