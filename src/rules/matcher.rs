use crate::error::{BuildPropError, Result};
use crate::rules::rewriter::rewrite;
use crate::rules::rule::Rule;
use regex::Regex;

/// A compiled rule ready for matching.
#[derive(Debug)]
pub struct CompiledRule<'a> {
	/// The original rule.
	pub rule: &'a Rule,

	/// Position of the rule in its list.
	pub index: usize,

	/// Compiled pattern regex.
	pub regex: Regex,
}

/// The winning rule for an input and the value it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
	pub rule: &'a Rule,
	pub index: usize,
	pub output: String,
}

impl<'a> CompiledRule<'a> {
	/// Compile the rule at `index` of its list.
	pub fn compile(rule: &'a Rule, index: usize) -> Result<Self> {
		let regex = Regex::new(rule.pattern()).map_err(|source| BuildPropError::InvalidRegex {
			index,
			pattern: rule.pattern().to_string(),
			source,
		})?;

		Ok(CompiledRule { rule, index, regex })
	}

	/// Apply this rule to the input, or `None` if the pattern does not occur.
	pub fn apply(&self, input: &str) -> Option<String> {
		let captures = self.regex.captures(input)?;
		let template = self.rule.replacement().unwrap_or("");
		Some(rewrite(&self.regex, &captures, input, template))
	}
}

/// Check that a rule list can be evaluated at all.
///
/// Every rule is inspected, so a blank pattern deep in the list is reported
/// even when an earlier rule would have matched.
pub fn validate_rules(rules: &[Rule]) -> Result<()> {
	if rules.is_empty() {
		return Err(BuildPropError::RulesEmpty);
	}

	if let Some(index) = rules.iter().position(|rule| rule.pattern().trim().is_empty()) {
		return Err(BuildPropError::RulePatternBlank { index });
	}

	Ok(())
}

/// Validate and compile all rules, preserving their order.
pub fn compile_rules(rules: &[Rule]) -> Result<Vec<CompiledRule<'_>>> {
	validate_rules(rules)?;

	rules
		.iter()
		.enumerate()
		.map(|(index, rule)| CompiledRule::compile(rule, index))
		.collect()
}

/// Find the first rule matching the input and compute its output.
pub fn find_matching_rule<'a>(rules: &[CompiledRule<'a>], input: &str) -> Option<RuleMatch<'a>> {
	rules.iter().find_map(|compiled| {
		compiled.apply(input).map(|output| RuleMatch {
			rule: compiled.rule,
			index: compiled.index,
			output,
		})
	})
}
