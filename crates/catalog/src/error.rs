use thiserror::Error;

use pricelens_core::DomainError;

use crate::store::StoreError;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error returned by the catalog operations.
///
/// Deterministic outcomes (not found, conflict, invalid input) are carried as
/// `DomainError`; only genuine backend failures stay as `Unavailable`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("catalog store unavailable: {0}")]
    Unavailable(String),

    /// A price total does not fit in `u64`.
    #[error("price total exceeds the supported range")]
    TotalOverflow,
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            // A constraint caught at write time is the same outcome as one
            // caught by the pre-check.
            StoreError::Duplicate { entity, key } => {
                CatalogError::Domain(DomainError::conflict(format!("{entity} already exists: {key}")))
            }
            StoreError::MissingReference { entity, key } => {
                CatalogError::Domain(DomainError::not_found(format!("{entity} not found: {key}")))
            }
            StoreError::Backend(msg) => CatalogError::Unavailable(msg),
        }
    }
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Domain(DomainError::NotFound(_)))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Domain(DomainError::Conflict(_)))
    }
}
