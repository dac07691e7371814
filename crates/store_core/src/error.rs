use thiserror::Error;

/// Defects in how the core is driven. Fetch failures never surface here;
/// they collapse into [`crate::CatalogState::Failed`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("index {index} is outside a collection of {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("grid layout needs at least one column, got {columns}")]
    InvalidLayout { columns: usize },
    #[error("unknown input `{0}`")]
    UnknownInput(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
