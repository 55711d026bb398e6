//! Core token lifecycle for tickoff
//!
//! `Period` computes when a freshly committed token should expire;
//! `Tick` binds a token store, a period, and the current token
//! together, with scoped acquisition that commits only when the
//! guarded work completed without error.

mod period;
mod tick;

pub use period::*;
pub use tick::*;
