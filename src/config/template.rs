/// Generate a template .buildprop.toml config file.
pub fn generate_init_template() -> String {
	r#"# buildprop configuration
# See: buildprop --help

# Stop looking for .buildprop.toml in parent directories
root = true

# Skip ~/.buildprop.toml when this environment variable is truthy
# user-config-disable-env-var = "CI"

# Where `buildprop run` writes the defined properties
properties-file = "target/build.properties"

# Derive a container tag from "<branch>@<version>"
[[execution]]
goal = "multi-regexp-property"
property = "image.tag"
value-from-env = "BUILD_REF"
no-rule-match-value = "1.0.0-SNAPSHOT"
rules = [
    { pattern = '^master@.*$', replacement = "latest" },
    { pattern = '^support/(.+)\.x@.*$', replacement = '\1-latest' },
]

# Flag CI builds
[[execution]]
goal = "environment-property"
property = "build.ci"
variable = "CI"
value = "true"
no-exist-value = "false"
"#
	.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_config_str;
	use std::path::Path;

	#[test]
	fn test_template_is_valid_config() {
		let config = parse_config_str(&generate_init_template(), Path::new(".buildprop.toml")).unwrap();
		assert!(config.root);
		assert_eq!(config.executions.len(), 2);
	}
}
