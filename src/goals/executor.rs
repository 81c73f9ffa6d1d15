use crate::config::types::{EnvironmentProperty, Execution, MultiRegexpProperty};
use crate::error::Result;
use crate::resolve::{Environment, resolve_by_environment, resolve_by_rules};
use crate::sink::{Definition, PropertySink, define_property};
use tracing::info;

/// Result of running one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// `skip` was set; nothing was validated or written.
	Skipped,
	/// The property now holds `value`.
	Defined { property: String, value: String },
	/// Overwriting was disabled and the property already had `existing`.
	Preserved { property: String, existing: String },
}

impl Outcome {
	fn from_definition(property: &str, value: Option<&str>, definition: Definition) -> Self {
		match definition {
			Definition::Written => Outcome::Defined {
				property: property.to_string(),
				value: value.unwrap_or("").to_string(),
			},
			Definition::Preserved { existing } => Outcome::Preserved {
				property: property.to_string(),
				existing,
			},
		}
	}
}

/// Run a multi-regexp-property execution.
pub fn execute_multi_regexp(
	goal: &MultiRegexpProperty,
	sink: &mut dyn PropertySink,
	env: &dyn Environment,
) -> Result<Outcome> {
	if goal.skip {
		info!("Skip match regex property per configuration");
		return Ok(Outcome::Skipped);
	}

	goal.validate()?;

	let input = match goal.value_from_env {
		Some(ref variable) => env.var(variable),
		None => goal.value.clone(),
	};

	let value = resolve_by_rules(
		input.as_deref(),
		&goal.rules,
		goal.no_rule_match_value.as_deref(),
	)?;

	let definition = define_property(sink, &goal.property, value.as_deref(), goal.overwrite)?;
	Ok(Outcome::from_definition(
		&goal.property,
		value.as_deref(),
		definition,
	))
}

/// Run an environment-property execution.
pub fn execute_environment(
	goal: &EnvironmentProperty,
	sink: &mut dyn PropertySink,
	env: &dyn Environment,
) -> Result<Outcome> {
	if goal.skip {
		info!("Skip environment property per configuration");
		return Ok(Outcome::Skipped);
	}

	goal.validate()?;

	let value = resolve_by_environment(&goal.variable, &goal.value, &goal.no_exist_value, |name| {
		env.contains(name)
	})?;

	let definition = define_property(sink, &goal.property, Some(value), goal.overwrite)?;
	Ok(Outcome::from_definition(
		&goal.property,
		Some(value),
		definition,
	))
}

/// Run any execution against the sink.
pub fn execute(
	execution: &Execution,
	sink: &mut dyn PropertySink,
	env: &dyn Environment,
) -> Result<Outcome> {
	match execution {
		Execution::MultiRegexpProperty(goal) => execute_multi_regexp(goal, sink, env),
		Execution::EnvironmentProperty(goal) => execute_environment(goal, sink, env),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::BuildPropError;
	use crate::rules::Rule;
	use crate::sink::PropertyMap;
	use std::collections::HashMap;

	const PROPERTY: &str = "image.tag";
	const FALLBACK: &str = "1.0.0-SNAPSHOT";

	fn regexp_goal(value: &str) -> MultiRegexpProperty {
		MultiRegexpProperty {
			property: PROPERTY.to_string(),
			value: Some(value.to_string()),
			no_rule_match_value: Some(FALLBACK.to_string()),
			rules: vec![
				Rule::new(r"^master@.*$", "latest"),
				Rule::new(r"^support/(.+)\.x@.*$", r"\1-latest"),
			],
			..Default::default()
		}
	}

	fn env_goal(variable: &str) -> EnvironmentProperty {
		EnvironmentProperty {
			property: "prop1".to_string(),
			variable: variable.to_string(),
			value: "value".to_string(),
			..Default::default()
		}
	}

	fn no_env() -> HashMap<String, String> {
		HashMap::new()
	}

	fn ci_env() -> HashMap<String, String> {
		HashMap::from([("CI".to_string(), "true".to_string())])
	}

	#[test]
	fn test_regexp_defines_property() {
		let mut props = PropertyMap::new();
		let outcome = execute_multi_regexp(&regexp_goal("master@"), &mut props, &no_env()).unwrap();

		assert_eq!(
			outcome,
			Outcome::Defined {
				property: PROPERTY.to_string(),
				value: "latest".to_string()
			}
		);
		assert_eq!(props.get(PROPERTY), Some("latest"));
	}

	#[test]
	fn test_regexp_same_goal_reused() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("support/cc@");
		goal.rules.push(Rule::new(r"^support/(\w+)@.*$", r"latest-\1"));

		execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();
		assert_eq!(props.get(PROPERTY), Some("latest-cc"));

		goal.value = Some("support/1.0.x@".to_string());
		execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();
		assert_eq!(props.get(PROPERTY), Some("1.0-latest"));
	}

	#[test]
	fn test_regexp_no_match_uses_fallback() {
		let mut props = PropertyMap::new();
		execute_multi_regexp(&regexp_goal("123"), &mut props, &no_env()).unwrap();
		assert_eq!(props.get(PROPERTY), Some(FALLBACK));
	}

	#[test]
	fn test_regexp_missing_fallback_defines_empty() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("develop");
		goal.no_rule_match_value = None;

		execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();
		assert_eq!(props.get(PROPERTY), Some(""));
	}

	#[test]
	fn test_regexp_release_version_rule_first() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("master@1.0.0");
		goal.rules.insert(0, Rule::new(r"^.+@(.+)$", r"\1"));
		goal.no_rule_match_value = None;

		execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();
		assert_eq!(props.get(PROPERTY), Some("1.0.0"));
	}

	#[test]
	fn test_regexp_overwrite_false() {
		let mut props = PropertyMap::new();
		props.set_always(PROPERTY, "some value");

		let mut goal = regexp_goal("support/1.0.x");
		goal.overwrite = false;
		let outcome = execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();

		assert_eq!(
			outcome,
			Outcome::Preserved {
				property: PROPERTY.to_string(),
				existing: "some value".to_string()
			}
		);
		assert_eq!(props.get(PROPERTY), Some("some value"));
	}

	#[test]
	fn test_regexp_value_from_env() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("ignored");
		goal.value = None;
		goal.value_from_env = Some("BUILD_REF".to_string());

		let env = HashMap::from([("BUILD_REF".to_string(), " support/2.1.x@abc ".to_string())]);
		execute_multi_regexp(&goal, &mut props, &env).unwrap();
		assert_eq!(props.get(PROPERTY), Some("2.1-latest"));

		execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();
		assert_eq!(props.get(PROPERTY), Some(FALLBACK));
	}

	#[test]
	fn test_regexp_value_and_value_from_env_rejected() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("master@");
		goal.value_from_env = Some("BUILD_REF".to_string());

		let err = execute_multi_regexp(&goal, &mut props, &no_env()).unwrap_err();
		assert!(matches!(err, BuildPropError::ValueSourceConflict));
		assert!(props.is_empty());
	}

	#[test]
	fn test_regexp_skip_does_nothing() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("master@");
		goal.skip = true;
		goal.rules.clear();

		let outcome = execute_multi_regexp(&goal, &mut props, &no_env()).unwrap();
		assert_eq!(outcome, Outcome::Skipped);
		assert!(props.is_empty());
	}

	#[test]
	fn test_regexp_blank_property() {
		let mut props = PropertyMap::new();
		let mut goal = regexp_goal("master@");
		goal.property = String::new();

		let err = execute_multi_regexp(&goal, &mut props, &no_env()).unwrap_err();
		assert!(matches!(err, BuildPropError::PropertyBlank));
	}

	#[test]
	fn test_environment_overwrite_false() {
		let mut props = PropertyMap::new();
		props.set_always("prop1", "some value");

		let mut goal = env_goal("CI");
		goal.overwrite = false;
		execute_environment(&goal, &mut props, &ci_env()).unwrap();

		assert_eq!(props.get("prop1"), Some("some value"));
	}

	#[test]
	fn test_environment_overwrite_true() {
		let mut props = PropertyMap::new();
		props.set_always("prop1", "some value");

		execute_environment(&env_goal("CI"), &mut props, &ci_env()).unwrap();

		assert_eq!(props.get("prop1"), Some("value"));
	}

	#[test]
	fn test_environment_absent_variable() {
		let mut props = PropertyMap::new();
		execute_environment(&env_goal("CI"), &mut props, &no_env()).unwrap();
		assert_eq!(props.get("prop1"), Some("false"));
	}

	#[test]
	fn test_environment_blank_variable() {
		let mut props = PropertyMap::new();
		let err = execute_environment(&env_goal(""), &mut props, &no_env()).unwrap_err();
		assert!(matches!(err, BuildPropError::VariableBlank));
	}

	#[test]
	fn test_execute_dispatches() {
		let mut props = PropertyMap::new();
		let executions = vec![
			Execution::MultiRegexpProperty(regexp_goal("master@")),
			Execution::EnvironmentProperty(env_goal("CI")),
		];

		for execution in &executions {
			execute(execution, &mut props, &ci_env()).unwrap();
		}

		assert_eq!(props.get(PROPERTY), Some("latest"));
		assert_eq!(props.get("prop1"), Some("value"));
	}
}
