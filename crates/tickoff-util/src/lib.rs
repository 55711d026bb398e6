//! Shared utilities for tickoff
//!
//! This crate provides:
//! - The `Clock` abstraction (system clock plus a manual clock for tests)
//! - Default state-directory and token-path resolution
//! - Duration parsing/formatting helpers for the CLI

mod clock;
mod duration;
mod paths;

pub use clock::*;
pub use duration::*;
pub use paths::*;
