//! Integration test utilities for the engagement core
//!
//! Fault-injecting fakes for the store and cache ports, a recording
//! notifier, and a ready-made world with one post to react to.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
