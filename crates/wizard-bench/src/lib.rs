//! Deterministic random-playout harness for the `wizard-core` rules engine.

pub mod config;
pub mod logging;
pub mod playout;
