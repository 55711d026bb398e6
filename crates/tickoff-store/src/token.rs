//! The persisted last-done record

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Records when the guarded action last ran and when that record
/// expires.
///
/// A token is immutable once constructed: "updating" one means minting
/// a new token and persisting it, never editing fields in place.
/// Validity is a wall-clock comparison against the single expiry
/// instant; queries take `now` explicitly so callers stay in charge of
/// the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    created_on: DateTime<Local>,
    expires_on: DateTime<Local>,

    /// Fields we do not understand but must round-trip unchanged
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Token {
    pub fn new(created_on: DateTime<Local>, expires_on: DateTime<Local>) -> Self {
        Self {
            created_on,
            expires_on,
            extra: Map::new(),
        }
    }

    /// The sentinel for an absent record: both timestamps set to `now`,
    /// so the token is expired the instant it is inspected
    /// (`expires_on` equals `created_on`, which is not in the future).
    pub fn expired_at(now: DateTime<Local>) -> Self {
        Self::new(now, now)
    }

    pub fn created_on(&self) -> DateTime<Local> {
        self.created_on
    }

    pub fn expires_on(&self) -> DateTime<Local> {
        self.expires_on
    }

    /// Time since the token was minted
    pub fn elapsed(&self, now: DateTime<Local>) -> chrono::Duration {
        now - self.created_on
    }

    pub fn is_valid(&self, now: DateTime<Local>) -> bool {
        self.expires_on > now
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        !self.is_valid(now)
    }
}
