use crate::config::parser::parse_config_file;
use crate::config::types::{ExecutionWithSource, LoadedConfig, MergedConfig};
use crate::error::{BuildPropError, Result};
use crate::resolve::{Environment, is_env_truthy};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".buildprop.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.buildprop.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.buildprop.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path, env: &dyn Environment) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	if let Some(user_config) = load_user_config(&configs, env)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.buildprop.toml if it exists and isn't disabled.
fn load_user_config(
	existing_configs: &[LoadedConfig],
	env: &dyn Environment,
) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.user_config_disable_env_var
			&& is_env_truthy(env, env_var)
		{
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	// The walk up from a directory under $HOME may already have loaded it.
	if existing_configs
		.iter()
		.any(|c| same_file(&c.path, &user_config_path))
	{
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

fn same_file(a: &Path, b: &Path) -> bool {
	match (a.canonicalize(), b.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}

/// Merge configs given in cascade order into a single run plan.
///
/// Executions run from the least specific config to the most specific one, so
/// with `overwrite` the nearest config has the last word.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs.iter().rev() {
		for execution in &loaded.config.executions {
			merged.executions.push(ExecutionWithSource {
				execution: execution.clone(),
				source: loaded.path.clone(),
			});
		}
	}

	merged.properties_file = configs.iter().find_map(|loaded| {
		let file = loaded.config.properties_file.as_ref()?;
		let base = loaded.path.parent().unwrap_or(Path::new(""));
		Some(base.join(file))
	});

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path, env: &dyn Environment) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir, env)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(BuildPropError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
