//! JSON-file-backed token store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use tickoff_util::{Clock, SystemClock};

use crate::{StoreError, StoreResult, Token, TokenStore};

/// Stores one token as a single JSON object in a file.
///
/// Reads are cached: after the first successful `load`, the token is
/// served from memory until a `store` to the same path invalidates the
/// cache. The invalidation happens synchronously inside `store`, so a
/// `load` after a successful write from the same process always
/// reflects the write. This at-most-one-read-until-write discipline is
/// part of the store contract, not an optimization.
pub struct FileStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<Token>>,
}

impl FileStore {
    /// Create a store bound to `path`, using the system clock for the
    /// absent-record sentinel.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Create a store bound to `path` with an injected clock.
    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_from_disk(&self) -> StoreResult<Token> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No token record, using expired default");
                return Ok(Token::expired_at(self.clock.now()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_str(&contents)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }
}

impl TokenStore for FileStore {
    fn load(&self) -> StoreResult<Token> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(token) = cache.as_ref() {
            return Ok(token.clone());
        }

        let token = self.read_from_disk()?;
        *cache = Some(token.clone());
        Ok(token)
    }

    fn store(&self, token: &Token) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(token)?;
        std::fs::write(&self.path, json)?;

        // Invalidate before returning so no caller can observe a stale
        // cached read after this write.
        *self.cache.lock().unwrap() = None;

        debug!(
            path = %self.path.display(),
            expires_on = %token.expires_on(),
            "Token stored"
        );
        Ok(())
    }
}
