//! Property value resolution.
//!
//! This module handles:
//! - Resolving a value from an ordered rule list with a no-match fallback
//! - Choosing between two constants based on an environment variable

pub mod environment;

pub use environment::{Environment, ProcessEnvironment, is_env_truthy};

use crate::error::{BuildPropError, Result};
use crate::rules::{Rule, compile_rules, find_matching_rule};
use tracing::debug;

/// Resolve a value by matching `input` against `rules` in order.
///
/// The input is trimmed (missing counts as empty) before matching. The first
/// matching rule produces the value; when none matches, `fallback` is returned
/// exactly as given. The whole rule list is validated and compiled before any
/// matching happens.
pub fn resolve_by_rules(
	input: Option<&str>,
	rules: &[Rule],
	fallback: Option<&str>,
) -> Result<Option<String>> {
	let compiled = compile_rules(rules)?;
	let input = input.unwrap_or("").trim();

	match find_matching_rule(&compiled, input) {
		Some(matched) => {
			debug!(
				index = matched.index,
				pattern = matched.rule.pattern(),
				"Rule matched"
			);
			Ok(Some(matched.output))
		}
		None => {
			debug!(input = %input, "No rule matched, using fallback");
			Ok(fallback.map(str::to_string))
		}
	}
}

/// Pick `present` when `lookup` reports the variable as set, else `absent`.
pub fn resolve_by_environment<'a>(
	variable: &str,
	present: &'a str,
	absent: &'a str,
	lookup: impl Fn(&str) -> bool,
) -> Result<&'a str> {
	if variable.trim().is_empty() {
		return Err(BuildPropError::VariableBlank);
	}

	Ok(if lookup(variable) { present } else { absent })
}
