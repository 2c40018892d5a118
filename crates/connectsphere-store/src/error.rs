use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate contact id: {0}")]
    DuplicateId(String),
    #[error("contact id was deleted and cannot be reused: {0}")]
    RetiredId(String),
    #[error("invalid stored row: {0}")]
    InvalidRow(String),
    #[error("migration error: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Json,
    MissingHomeDir,
    InvalidDataPath,
    NotFound,
    DuplicateId,
    RetiredId,
    InvalidRow,
    Migration,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Json(_) => StoreErrorKind::Json,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::DuplicateId(_) => StoreErrorKind::DuplicateId,
            StoreError::RetiredId(_) => StoreErrorKind::RetiredId,
            StoreError::InvalidRow(_) => StoreErrorKind::InvalidRow,
            StoreError::Migration(_) => StoreErrorKind::Migration,
        }
    }
}
