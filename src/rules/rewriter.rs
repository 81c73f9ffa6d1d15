use regex::{Captures, NoExpand, Regex};

/// Expand `\N` back-references in a replacement template.
///
/// Only groups `1..=G` of the given captures are substituted; any other
/// `\` sequence is copied verbatim. The template is scanned once, so captured
/// text that itself contains `\2` is never expanded again. Groups that did not
/// participate in the match expand to the empty string.
pub fn expand_backreferences(template: &str, captures: &Captures) -> String {
	let groups = captures.len().saturating_sub(1);
	if groups == 0 {
		return template.to_string();
	}

	let mut expanded = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(pos) = rest.find('\\') {
		expanded.push_str(&rest[..pos]);
		let after = &rest[pos + 1..];

		match group_reference(after, groups) {
			Some((index, consumed)) => {
				expanded.push_str(captures.get(index).map_or("", |m| m.as_str()));
				rest = &after[consumed..];
			}
			None => {
				expanded.push('\\');
				rest = after;
			}
		}
	}

	expanded.push_str(rest);
	expanded
}

/// Parse the group number following a backslash.
///
/// Returns the group index and how many bytes of digits it used. The longest
/// digit prefix naming an existing group wins, so `\12` with three groups is
/// group 1 followed by a literal `2`. Numbers with a leading zero never match.
fn group_reference(after: &str, groups: usize) -> Option<(usize, usize)> {
	let digits = after.bytes().take_while(u8::is_ascii_digit).count();
	if digits == 0 || after.starts_with('0') {
		return None;
	}

	(1..=digits).rev().find_map(|len| {
		let index: usize = after[..len].parse().ok()?;
		(index <= groups).then_some((index, len))
	})
}

/// Replace every match of `regex` in `input` with `replacement`, taken literally.
pub fn splice(regex: &Regex, input: &str, replacement: &str) -> String {
	regex.replace_all(input, NoExpand(replacement)).into_owned()
}

/// Produce a rule's output for an input its pattern is known to match.
///
/// The template is expanded against the first match, trimmed, and then
/// spliced over every match in the input.
pub fn rewrite(regex: &Regex, captures: &Captures, input: &str, template: &str) -> String {
	let expanded = expand_backreferences(template, captures);
	splice(regex, input, expanded.trim())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn expand(pattern: &str, input: &str, template: &str) -> String {
		let regex = Regex::new(pattern).unwrap();
		let captures = regex.captures(input).unwrap();
		expand_backreferences(template, &captures)
	}

	fn apply(pattern: &str, input: &str, template: &str) -> String {
		let regex = Regex::new(pattern).unwrap();
		let captures = regex.captures(input).unwrap();
		rewrite(&regex, &captures, input, template)
	}

	#[test]
	fn test_expand_multiple_groups_out_of_order() {
		assert_eq!(
			expand(r"(feature)/(\w+)-(\d+)", "feature/ALM-123", r"\3 prj \2"),
			"123 prj ALM"
		);
	}

	#[test]
	fn test_expand_leaves_unknown_groups() {
		assert_eq!(expand(r"(a)", "a", r"\1-\2-\0"), r"a-\2-\0");
	}

	#[test]
	fn test_expand_without_groups_is_verbatim() {
		assert_eq!(expand(r"abc", "abc", r"x\1y"), r"x\1y");
	}

	#[test]
	fn test_expand_does_not_rescan_inserted_text() {
		// Group 1 captures a literal `\2`, which must survive untouched.
		assert_eq!(expand(r"^(.+)@(.+)$", r"a\2@b", r"\1/\2"), r"a\2/b");
	}

	#[test]
	fn test_expand_longest_valid_group() {
		let pattern = r"(a)(b)(c)(d)(e)(f)(g)(h)(i)(j)(k)";
		assert_eq!(expand(pattern, "abcdefghijk", r"\11"), "k");
		assert_eq!(expand(r"(a)(b)(c)", "abc", r"\12"), "a2");
	}

	#[test]
	fn test_expand_non_participating_group_is_empty() {
		assert_eq!(expand(r"^(x)?(y)$", "y", r"[\1][\2]"), "[][y]");
	}

	#[test]
	fn test_expand_trailing_backslash() {
		assert_eq!(expand(r"(a)", "a", "\\1\\"), "a\\");
	}

	#[test]
	fn test_rewrite_anchored_full_match() {
		assert_eq!(apply(r"^master@.*$", "master@", "latest"), "latest");
	}

	#[test]
	fn test_rewrite_partial_capture() {
		assert_eq!(
			apply(r"^support/(.+)\.x@.*$", "support/1.0.x@", r"\1-latest"),
			"1.0-latest"
		);
	}

	#[test]
	fn test_rewrite_keeps_unmatched_input() {
		assert_eq!(apply(r"^feature/", "feature/login", "f-"), "f-login");
	}

	#[test]
	fn test_rewrite_replaces_every_match() {
		assert_eq!(apply(r"\.", "1.2.3", "_"), "1_2_3");
	}

	#[test]
	fn test_rewrite_uses_first_match_captures_everywhere() {
		assert_eq!(apply(r"(\d)", "a1b2", r"<\1>"), "a<1>b<1>");
	}

	#[test]
	fn test_rewrite_trims_expanded_template() {
		assert_eq!(apply(r"^master$", "master", "  latest \t"), "latest");
	}

	#[test]
	fn test_rewrite_template_is_literal() {
		assert_eq!(apply(r"^(v)1$", "v1", "$1 ${0}"), "$1 ${0}");
	}

	#[test]
	fn test_rewrite_empty_template() {
		assert_eq!(apply(r"-SNAPSHOT$", "1.0-SNAPSHOT", ""), "1.0");
	}
}
