use crate::error::{BuildPropError, Result};
use serde::Deserialize;

/// A pattern/replacement pair.
///
/// The replacement may reference capture groups of the pattern with `\1`,
/// `\2`, and so on. A missing replacement behaves like an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	#[serde(alias = "regexp")]
	pattern: String,

	#[serde(default)]
	replacement: Option<String>,
}

impl Rule {
	pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
		Rule {
			pattern: pattern.into(),
			replacement: Some(replacement.into()),
		}
	}

	/// A rule whose replacement is absent rather than empty.
	pub fn without_replacement(pattern: impl Into<String>) -> Self {
		Rule {
			pattern: pattern.into(),
			replacement: None,
		}
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn replacement(&self) -> Option<&str> {
		self.replacement.as_deref()
	}

	/// Parse a rule in sed-like format: "s/pattern/replacement/".
	///
	/// Any character after the leading `s` is the delimiter; a backslash
	/// escapes it inside the pattern or replacement. The trailing delimiter is
	/// optional and the `g` flag is accepted (every match is replaced anyway).
	pub fn parse(input: &str) -> Result<Self> {
		let syntax_error = |reason: &str| BuildPropError::InvalidRuleSyntax {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let Some(body) = input.strip_prefix('s') else {
			return Err(syntax_error("rule must start with 's'"));
		};

		let mut chars = body.chars();
		let Some(delimiter) = chars.next() else {
			return Err(syntax_error("rule too short"));
		};
		if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter.is_whitespace() {
			return Err(syntax_error("delimiter must be a punctuation character"));
		}

		let parts = split_by_delimiter(chars.as_str(), delimiter);
		if parts.len() < 2 {
			return Err(syntax_error("rule must have pattern and replacement"));
		}
		if parts.len() > 3 {
			return Err(syntax_error("too many delimiters"));
		}

		let flags = parts.get(2).map(String::as_str).unwrap_or("");
		if !flags.chars().all(|c| c == 'g') {
			return Err(syntax_error("only the 'g' flag is supported"));
		}

		Ok(Rule::new(parts[0].clone(), parts[1].clone()))
	}
}

/// Split a string by a delimiter, respecting backslash escapes.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' && chars.peek() == Some(&delimiter) {
			current.push(delimiter);
			chars.next();
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}

	// A trailing delimiter leaves an empty flags part, which is fine.
	parts.push(current);

	parts
}
