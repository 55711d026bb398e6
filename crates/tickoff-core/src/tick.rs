//! The Tick orchestrator
//!
//! A `Tick` binds one token store, one expiration period, and the
//! current in-memory token. Construction loads the token; `commit`
//! mints and persists a fresh one. Scoped acquisition (`scope`) and the
//! guarded-run helper (`run`) make the commit decision hinge on whether
//! the guarded work completed without error.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use tickoff_store::{FileStore, StoreError, StoreResult, Token, TokenStore};
use tickoff_util::{Clock, SystemClock};

use crate::Period;

/// Error from [`Tick::run`]: either the store failed or the guarded
/// action itself did. Neither case commits a new token.
#[derive(Debug, Error)]
pub enum GuardError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Guarded action failed: {0}")]
    Action(#[source] E),
}

/// Binds an identifier's store, a period, and the current token.
///
/// The same period is used for every `commit` on this instance. All
/// validity checks are evaluated against the injected clock.
pub struct Tick {
    store: Arc<dyn TokenStore>,
    period: Period,
    clock: Arc<dyn Clock>,
    token: Token,
}

impl Tick {
    /// Load a tick from `store` using the system clock.
    pub fn new(store: Arc<dyn TokenStore>, period: Period) -> StoreResult<Self> {
        Self::with_clock(store, period, Arc::new(SystemClock))
    }

    /// Load a tick from `store` with an injected clock.
    pub fn with_clock(
        store: Arc<dyn TokenStore>,
        period: Period,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        let token = store.load()?;
        Ok(Self {
            store,
            period,
            clock,
            token,
        })
    }

    /// Convenience constructor over a file-backed store.
    pub fn open(path: impl Into<PathBuf>, period: Period) -> StoreResult<Self> {
        Self::new(Arc::new(FileStore::new(path)), period)
    }

    /// The current in-memory token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Re-read the token through the store.
    pub fn reload(&mut self) -> StoreResult<&Token> {
        self.token = self.store.load()?;
        Ok(&self.token)
    }

    pub fn is_valid(&self) -> bool {
        self.token.is_valid(self.clock.now())
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_expired(self.clock.now())
    }

    /// Time since the current token was minted.
    pub fn elapsed(&self) -> chrono::Duration {
        self.token.elapsed(self.clock.now())
    }

    /// Mint a fresh token expiring per the period and persist it.
    ///
    /// The in-memory token is re-read through the store afterwards so
    /// it reflects exactly what was persisted.
    pub fn commit(&mut self) -> StoreResult<()> {
        let now = self.clock.now();
        let token = Token::new(now, self.period.expires_on(now));
        self.store.store(&token)?;
        self.token = self.store.load()?;

        debug!(expires_on = %self.token.expires_on(), "Token committed");
        Ok(())
    }

    /// Enter a guarded scope, re-reading the token first.
    ///
    /// Call [`TickScope::complete`] when the guarded work succeeded to
    /// commit a fresh token. Dropping the scope without completing it
    /// commits nothing, so a failed action is never marked as done.
    pub fn scope(&mut self) -> StoreResult<TickScope<'_>> {
        self.reload()?;
        Ok(TickScope { tick: self })
    }

    /// Run `f` only if the token has expired, committing on success.
    ///
    /// Returns `Ok(None)` without invoking `f` while the token is
    /// still valid, and `Ok(Some(value))` after a successful run and
    /// commit. An error from `f` propagates and leaves the stored
    /// token untouched.
    pub fn run<T, E, F>(&mut self, f: F) -> Result<Option<T>, GuardError<E>>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::error::Error + 'static,
    {
        self.reload()?;
        if self.is_valid() {
            debug!(expires_on = %self.token.expires_on(), "Token still valid, skipping");
            return Ok(None);
        }

        let value = f().map_err(GuardError::Action)?;
        self.commit()?;
        Ok(Some(value))
    }
}

/// A guarded scope over a [`Tick`].
///
/// The scope holds the tick exclusively; whether a new token gets
/// committed is decided by how the scope ends: `complete` commits,
/// dropping does not.
pub struct TickScope<'a> {
    tick: &'a mut Tick,
}

impl TickScope<'_> {
    pub fn token(&self) -> &Token {
        self.tick.token()
    }

    pub fn is_valid(&self) -> bool {
        self.tick.is_valid()
    }

    pub fn is_expired(&self) -> bool {
        self.tick.is_expired()
    }

    /// Mark the guarded work as done: commits a fresh token.
    pub fn complete(self) -> StoreResult<()> {
        self.tick.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::time::Duration;
    use tickoff_util::ManualClock;

    fn fixture(path: &std::path::Path, period: Period) -> (Arc<ManualClock>, Tick) {
        let start = Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let store = Arc::new(FileStore::with_clock(path, clock.clone()));
        let tick = Tick::with_clock(store, period, clock.clone()).unwrap();
        (clock, tick)
    }

    #[test]
    fn tick_on_missing_file_starts_expired() {
        let dir = tempfile::tempdir().unwrap();
        let (_clock, tick) = fixture(
            &dir.path().join("token.json"),
            Period::ValidFor(Duration::from_secs(60)),
        );

        assert!(tick.is_expired());
        assert!(!tick.is_valid());
    }

    #[test]
    fn commit_mints_a_valid_token() {
        let dir = tempfile::tempdir().unwrap();
        let (clock, mut tick) = fixture(
            &dir.path().join("token.json"),
            Period::ValidFor(Duration::from_secs(60)),
        );

        tick.commit().unwrap();

        assert!(tick.is_valid());
        assert_eq!(tick.token().created_on(), clock.now());
        assert_eq!(
            tick.token().expires_on(),
            clock.now() + chrono::Duration::seconds(60)
        );
    }

    #[test]
    fn validity_flips_at_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let (clock, mut tick) = fixture(
            &dir.path().join("token.json"),
            Period::ValidFor(Duration::from_secs(60)),
        );

        tick.commit().unwrap();
        clock.advance(chrono::Duration::seconds(59));
        assert!(tick.is_valid());

        clock.advance(chrono::Duration::seconds(1));
        assert!(tick.is_expired());
    }

    #[test]
    fn elapsed_tracks_the_clock() {
        let dir = tempfile::tempdir().unwrap();
        let (clock, mut tick) = fixture(
            &dir.path().join("token.json"),
            Period::ValidFor(Duration::from_secs(60)),
        );

        tick.commit().unwrap();
        clock.advance(chrono::Duration::seconds(42));
        assert_eq!(tick.elapsed(), chrono::Duration::seconds(42));
    }

    #[test]
    fn scope_complete_commits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let (_clock, mut tick) = fixture(&path, Period::ValidFor(Duration::from_secs(60)));

        let scope = tick.scope().unwrap();
        assert!(scope.is_expired());
        scope.complete().unwrap();

        assert!(path.is_file());
        assert!(tick.is_valid());
    }

    #[test]
    fn scope_dropped_without_complete_commits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let (_clock, mut tick) = fixture(&path, Period::ValidFor(Duration::from_secs(60)));

        {
            let scope = tick.scope().unwrap();
            assert!(scope.is_expired());
            // Error path: the scope is dropped without complete().
        }

        assert!(!path.exists());
        assert!(tick.is_expired());
    }

    #[test]
    fn run_skips_while_token_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let (_clock, mut tick) = fixture(
            &dir.path().join("token.json"),
            Period::ValidFor(Duration::from_secs(60)),
        );

        tick.commit().unwrap();

        let mut invoked = false;
        let result: Result<Option<()>, GuardError<std::io::Error>> = tick.run(|| {
            invoked = true;
            Ok(())
        });

        assert!(matches!(result, Ok(None)));
        assert!(!invoked);
    }

    #[test]
    fn run_executes_and_commits_when_expired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let (clock, mut tick) = fixture(&path, Period::ValidFor(Duration::from_secs(60)));

        let result: Result<Option<u32>, GuardError<std::io::Error>> = tick.run(|| Ok(7));

        assert!(matches!(result, Ok(Some(7))));
        assert!(path.is_file());
        assert!(tick.is_valid());
        assert_eq!(tick.token().created_on(), clock.now());
    }

    #[test]
    fn run_failure_does_not_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let (_clock, mut tick) = fixture(&path, Period::ValidFor(Duration::from_secs(60)));

        let result: Result<Option<()>, GuardError<std::io::Error>> =
            tick.run(|| Err(std::io::Error::other("action blew up")));

        assert!(matches!(result, Err(GuardError::Action(_))));
        assert!(!path.exists());
        assert!(tick.is_expired());
    }

    #[test]
    fn commit_resynchronizes_with_the_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let (clock, mut tick) = fixture(&path, Period::ValidFor(Duration::from_secs(60)));

        tick.commit().unwrap();

        // The in-memory token matches what a fresh reader sees on disk.
        let fresh = FileStore::with_clock(&path, clock.clone());
        assert_eq!(fresh.load().unwrap(), *tick.token());
    }
}
