//! Rule matching and rewriting for buildprop.
//!
//! This module handles:
//! - The pattern/replacement rule value and its sed-like text form
//! - Ordered, first-match-wins evaluation of a rule list
//! - Back-reference expansion and splicing of the winning replacement

pub mod matcher;
pub mod rewriter;
pub mod rule;

pub use matcher::{CompiledRule, RuleMatch, compile_rules, find_matching_rule, validate_rules};
pub use rewriter::{expand_backreferences, rewrite, splice};
pub use rule::Rule;
