//! Goal execution for buildprop.
//!
//! This module handles:
//! - multi-regexp-property (value derived from ordered regex rules)
//! - environment-property (value derived from an environment variable's presence)
//! - Skip handling and the overwrite policy

pub mod executor;

pub use executor::{Outcome, execute, execute_environment, execute_multi_regexp};
