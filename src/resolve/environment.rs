use std::collections::HashMap;

/// Read access to a set of environment variables.
pub trait Environment {
	/// Value of the variable, if set and valid unicode.
	fn var(&self, name: &str) -> Option<String>;

	/// Whether the variable is set at all.
	fn contains(&self, name: &str) -> bool {
		self.var(name).is_some()
	}
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
	fn var(&self, name: &str) -> Option<String> {
		std::env::var(name).ok()
	}

	fn contains(&self, name: &str) -> bool {
		std::env::var_os(name).is_some()
	}
}

impl Environment for HashMap<String, String> {
	fn var(&self, name: &str) -> Option<String> {
		self.get(name).cloned()
	}
}

/// Check if an environment variable is set to a truthy value.
///
/// Unset, empty, `0`, `false` and `no` (any case) are falsy.
pub fn is_env_truthy(env: &dyn Environment, name: &str) -> bool {
	match env.var(name) {
		Some(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		None => false,
	}
}
