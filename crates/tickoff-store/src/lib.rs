//! Persistence layer for tickoff
//!
//! Provides:
//! - The `Token` record (last-run and expiry timestamps)
//! - The `TokenStore` contract
//! - A JSON-file-backed implementation with read caching

mod file;
mod token;
mod traits;

pub use file::*;
pub use token::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record exists but does not parse into the expected shape.
    /// Deliberately not treated as absent: a corrupt record means a
    /// writer's intent we must not silently discard.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
