//! buildprop - build-time property calculator.
//!
//! This library provides the core functionality for buildprop, including:
//! - Ordered, first-match-wins regex rules with `\N` back-references
//! - Value resolution with a no-match fallback, or from an environment variable's presence
//! - Property sinks with an overwrite-or-preserve policy
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```
//! use buildprop_cli::rules::Rule;
//! use buildprop_cli::resolve::resolve_by_rules;
//!
//! let rules = vec![
//!     Rule::new(r"^master@.*$", "latest"),
//!     Rule::new(r"^support/(.+)\.x@.*$", r"\1-latest"),
//! ];
//!
//! let tag = resolve_by_rules(Some("support/1.0.x@"), &rules, Some("1.0.0-SNAPSHOT")).unwrap();
//! assert_eq!(tag.as_deref(), Some("1.0-latest"));
//! ```

pub mod config;
pub mod error;
pub mod goals;
pub mod resolve;
pub mod rules;
pub mod sink;

pub use error::{BuildPropError, Result};
