use crate::error::{BuildPropError, Result};
use crate::sink::PropertySink;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// An in-memory property set, optionally backed by a `key=value` file.
///
/// Keys are kept sorted so rendered files are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
	entries: BTreeMap<String, String>,
}

impl PropertyMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse properties text.
	///
	/// Blank lines and lines starting with `#` or `!` are ignored. The key runs
	/// up to the first unescaped `=` or `:`; the value is the rest with leading
	/// whitespace removed. Backslash escapes are resolved in both. Lines without
	/// a separator define an empty value.
	pub fn parse(content: &str) -> Self {
		let mut entries = BTreeMap::new();

		for line in content.lines() {
			let trimmed = line.trim_start();
			if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
				continue;
			}

			let (key, value) = split_entry(trimmed);
			entries.insert(
				unescape(trim_end_unescaped(key)),
				unescape(value.trim_start()),
			);
		}

		PropertyMap { entries }
	}

	/// Render as properties text, one escaped `key=value` per line.
	pub fn render(&self) -> String {
		let mut out = String::new();
		for (key, value) in &self.entries {
			let _ = writeln!(out, "{}", format_entry(key, value));
		}
		out
	}

	/// Load a properties file. A missing file is an empty property set.
	pub fn load(path: &Path) -> Result<Self> {
		match std::fs::read_to_string(path) {
			Ok(content) => Ok(Self::parse(&content)),
			Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
			Err(source) => Err(BuildPropError::PropertiesReadError {
				path: path.to_path_buf(),
				source,
			}),
		}
	}

	/// Write the properties file, creating parent directories as needed.
	pub fn save(&self, path: &Path) -> Result<()> {
		let write_error = |source: std::io::Error| BuildPropError::PropertiesWriteError {
			path: path.to_path_buf(),
			source,
		};

		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			std::fs::create_dir_all(parent).map_err(write_error)?;
		}

		std::fs::write(path, self.render()).map_err(write_error)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}

impl PropertySink for PropertyMap {
	fn get(&self, name: &str) -> Option<&str> {
		self.entries.get(name).map(String::as_str)
	}

	fn set_always(&mut self, name: &str, value: &str) {
		self.entries.insert(name.to_string(), value.to_string());
	}
}

/// Format one `key=value` line, escaped so `parse` reads back the same pair.
pub fn format_entry(key: &str, value: &str) -> String {
	format!("{}={}", escape(key, true), escape(value, false))
}

fn escape(text: &str, is_key: bool) -> String {
	let mut out = String::with_capacity(text.len());
	for (i, c) in text.chars().enumerate() {
		match c {
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'=' | ':' | '#' | '!' => {
				out.push('\\');
				out.push(c);
			}
			' ' if is_key || i == 0 => out.push_str("\\ "),
			_ => out.push(c),
		}
	}
	out
}

fn unescape(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('t') => out.push('\t'),
			Some(other) => out.push(other),
			None => {}
		}
	}
	out
}

/// Split a line at the first unescaped `=` or `:`.
fn split_entry(line: &str) -> (&str, &str) {
	let mut escaped = false;
	for (i, c) in line.char_indices() {
		match c {
			_ if escaped => escaped = false,
			'\\' => escaped = true,
			'=' | ':' => return (&line[..i], &line[i + c.len_utf8()..]),
			_ => {}
		}
	}
	(line, "")
}

/// Trim trailing whitespace, keeping a whitespace char that is escaped.
fn trim_end_unescaped(raw: &str) -> &str {
	let trimmed = raw.trim_end();
	let backslashes = trimmed.bytes().rev().take_while(|&b| b == b'\\').count();
	if backslashes % 2 == 0 {
		return trimmed;
	}
	let kept = raw[trimmed.len()..].chars().next().map_or(0, char::len_utf8);
	&raw[..trimmed.len() + kept]
}
