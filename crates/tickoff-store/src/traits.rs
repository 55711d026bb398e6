//! Store trait definitions

use crate::{StoreResult, Token};

/// Storage for the token behind one identifier.
///
/// A store instance is bound to a single identifier (for the file
/// backend, a path) at construction; there is at most one stored token
/// per identifier at any time. No cross-writer exclusion is provided:
/// concurrent writers race and the last `store` wins.
pub trait TokenStore: Send + Sync {
    /// Load the current token.
    ///
    /// An absent record is not an error: it yields a fresh,
    /// already-expired default token. A record that exists but fails to
    /// parse surfaces as [`StoreError::Corrupt`](crate::StoreError).
    fn load(&self) -> StoreResult<Token>;

    /// Durably persist `token`, replacing any previous record.
    /// Idempotent: storing the same token twice produces the same
    /// persisted state.
    fn store(&self, token: &Token) -> StoreResult<()>;
}
