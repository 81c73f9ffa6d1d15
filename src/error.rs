use std::path::PathBuf;

/// Library-level structured errors for buildprop.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum BuildPropError {
	#[error("property is required")]
	PropertyBlank,

	#[error("variable is required")]
	VariableBlank,

	#[error("value and value-from-env are mutually exclusive")]
	ValueSourceConflict,

	#[error("At least a regexp rule is required")]
	RulesEmpty,

	#[error("Rule {index} has a blank pattern")]
	RulePatternBlank { index: usize },

	#[error("Invalid rule syntax: {input} ({reason})")]
	InvalidRuleSyntax { input: String, reason: String },

	#[error("Invalid regex pattern in rule {index}: {pattern}")]
	InvalidRegex {
		index: usize,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid config file: {path}")]
	ConfigInvalid {
		path: PathBuf,
		#[source]
		source: Box<BuildPropError>,
	},

	#[error("Failed to read properties file: {path}")]
	PropertiesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write properties file: {path}")]
	PropertiesWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl BuildPropError {
	/// True for missing or blank required settings, raised before any matching.
	pub fn is_configuration_error(&self) -> bool {
		match self {
			BuildPropError::PropertyBlank
			| BuildPropError::VariableBlank
			| BuildPropError::ValueSourceConflict
			| BuildPropError::RulesEmpty
			| BuildPropError::RulePatternBlank { .. }
			| BuildPropError::InvalidRuleSyntax { .. } => true,
			BuildPropError::ConfigInvalid { source, .. } => source.is_configuration_error(),
			_ => false,
		}
	}
}

/// Result type alias using BuildPropError.
pub type Result<T> = std::result::Result<T, BuildPropError>;
