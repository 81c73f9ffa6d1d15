use crate::error::{BuildPropError, Result};
use crate::rules::{Rule, validate_rules};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.buildprop.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade here and continue with ~/.buildprop.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.buildprop.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub user_config_disable_env_var: Option<String>,

	/// Properties file receiving defined values, relative to the config file.
	#[serde(default)]
	pub properties_file: Option<PathBuf>,

	/// Property definitions, run in order.
	#[serde(default, rename = "execution")]
	pub executions: Vec<Execution>,
}

/// One property definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "goal", rename_all = "kebab-case")]
pub enum Execution {
	MultiRegexpProperty(MultiRegexpProperty),
	EnvironmentProperty(EnvironmentProperty),
}

/// Sets a property by matching a value against ordered regex rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MultiRegexpProperty {
	/// The property to set.
	pub property: String,

	/// The value the rules are matched against.
	#[serde(default)]
	pub value: Option<String>,

	/// Environment variable providing the value. Cannot be combined with `value`.
	#[serde(default)]
	pub value_from_env: Option<String>,

	/// The value used when no rule matches.
	#[serde(default)]
	pub no_rule_match_value: Option<String>,

	/// Ordered rules; first match wins.
	#[serde(default)]
	pub rules: Vec<Rule>,

	/// Replace an existing property value.
	#[serde(default = "default_true")]
	pub overwrite: bool,

	/// Skip this execution entirely.
	#[serde(default)]
	pub skip: bool,
}

/// Sets a property depending on whether an environment variable exists.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnvironmentProperty {
	/// The property to set.
	pub property: String,

	/// The environment variable to look for.
	pub variable: String,

	/// The value when the variable exists.
	#[serde(default = "default_present_value")]
	pub value: String,

	/// The value when the variable does not exist.
	#[serde(default = "default_absent_value")]
	pub no_exist_value: String,

	/// Replace an existing property value.
	#[serde(default = "default_true")]
	pub overwrite: bool,

	/// Skip this execution entirely.
	#[serde(default)]
	pub skip: bool,
}

fn default_true() -> bool {
	true
}

fn default_present_value() -> String {
	"true".to_string()
}

fn default_absent_value() -> String {
	"false".to_string()
}

impl Default for MultiRegexpProperty {
	fn default() -> Self {
		MultiRegexpProperty {
			property: String::new(),
			value: None,
			value_from_env: None,
			no_rule_match_value: None,
			rules: Vec::new(),
			overwrite: true,
			skip: false,
		}
	}
}

impl Default for EnvironmentProperty {
	fn default() -> Self {
		EnvironmentProperty {
			property: String::new(),
			variable: String::new(),
			value: default_present_value(),
			no_exist_value: default_absent_value(),
			overwrite: true,
			skip: false,
		}
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All executions in run order: user config first, nearest directory last.
	pub executions: Vec<ExecutionWithSource>,

	/// Properties file from the nearest config that names one, already
	/// resolved against that config's directory.
	pub properties_file: Option<PathBuf>,
}

/// An execution with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct ExecutionWithSource {
	/// The execution itself.
	pub execution: Execution,

	/// The config file this execution came from.
	pub source: PathBuf,
}

impl Execution {
	/// The property this execution defines.
	pub fn property(&self) -> &str {
		match self {
			Execution::MultiRegexpProperty(goal) => &goal.property,
			Execution::EnvironmentProperty(goal) => &goal.property,
		}
	}

	/// The goal name as written in config files.
	pub fn goal_name(&self) -> &'static str {
		match self {
			Execution::MultiRegexpProperty(_) => "multi-regexp-property",
			Execution::EnvironmentProperty(_) => "environment-property",
		}
	}

	pub fn is_skipped(&self) -> bool {
		match self {
			Execution::MultiRegexpProperty(goal) => goal.skip,
			Execution::EnvironmentProperty(goal) => goal.skip,
		}
	}

	pub fn validate(&self) -> Result<()> {
		match self {
			Execution::MultiRegexpProperty(goal) => goal.validate(),
			Execution::EnvironmentProperty(goal) => goal.validate(),
		}
	}
}

impl MultiRegexpProperty {
	/// Check required settings. Patterns are not compiled here.
	pub fn validate(&self) -> Result<()> {
		if self.property.trim().is_empty() {
			return Err(BuildPropError::PropertyBlank);
		}
		if self.value.is_some() && self.value_from_env.is_some() {
			return Err(BuildPropError::ValueSourceConflict);
		}
		validate_rules(&self.rules)
	}
}

impl EnvironmentProperty {
	pub fn validate(&self) -> Result<()> {
		if self.property.trim().is_empty() {
			return Err(BuildPropError::PropertyBlank);
		}
		if self.variable.trim().is_empty() {
			return Err(BuildPropError::VariableBlank);
		}
		Ok(())
	}
}

impl Config {
	/// Validate all executions in this config. Skipped ones are not checked.
	pub fn validate(&self) -> Result<()> {
		for execution in self.executions.iter().filter(|e| !e.is_skipped()) {
			execution.validate()?;
		}
		Ok(())
	}
}
