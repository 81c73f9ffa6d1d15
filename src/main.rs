use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use buildprop_cli::config::{
	CONFIG_FILE_NAME, EnvironmentProperty, Execution, MultiRegexpProperty, discover_configs,
	generate_init_template, load_merged_config, user_config_path,
};
use buildprop_cli::goals::{Outcome, execute};
use buildprop_cli::resolve::ProcessEnvironment;
use buildprop_cli::rules::{Rule, compile_rules};
use buildprop_cli::sink::{PropertyMap, format_entry};

#[derive(Parser)]
#[command(name = "buildprop")]
#[command(
	author,
	version,
	about = "Build-time property calculator driven by ordered regex rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .buildprop.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .buildprop.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log verbosity (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Define a property from the first regex rule matching a value
	Regex(RegexArgs),
	/// Define a property from whether an environment variable exists
	Env(EnvArgs),
	/// Run every execution found in the configuration cascade
	Run(OutputArgs),
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display configuration files in cascade order with their executions
	Show,
	/// Check all config files and rule patterns for errors without defining anything
	Validate,
}

#[derive(Args)]
struct RegexArgs {
	/// The property to set
	#[arg(long)]
	property: String,

	/// The value the rules are matched against
	#[arg(long, allow_hyphen_values = true)]
	value: Option<String>,

	/// Rule as "s/PATTERN/REPLACEMENT/"; repeat in priority order
	#[arg(long = "rule", value_name = "RULE", required = true, allow_hyphen_values = true)]
	rules: Vec<String>,

	/// The value used when no rule matches
	#[arg(long, allow_hyphen_values = true)]
	no_rule_match_value: Option<String>,

	/// Keep an existing property value
	#[arg(long)]
	no_overwrite: bool,

	#[command(flatten)]
	output: OutputArgs,
}

#[derive(Args)]
struct EnvArgs {
	/// The property to set
	#[arg(long)]
	property: String,

	/// The environment variable to look for
	#[arg(long)]
	variable: String,

	/// The value when the variable exists
	#[arg(long, default_value = "true", allow_hyphen_values = true)]
	value: String,

	/// The value when the variable does not exist
	#[arg(long, default_value = "false", allow_hyphen_values = true)]
	no_exist_value: String,

	/// Keep an existing property value
	#[arg(long)]
	no_overwrite: bool,

	#[command(flatten)]
	output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
	/// Properties file to update instead of printing to stdout
	#[arg(long, value_name = "PATH")]
	properties_file: Option<PathBuf>,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn setup_logging(verbose: u8) {
	use tracing_subscriber::EnvFilter;

	let default_level = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	let filter =
		EnvFilter::try_from_env("BUILDPROP_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.without_time()
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if cli.init {
		return handle_init(cli.force);
	}

	match cli.command {
		Some(Commands::Regex(args)) => handle_regex(args),
		Some(Commands::Env(args)) => handle_env(args),
		Some(Commands::Run(output)) => handle_run(output),
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
		// Unreachable in practice due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_regex(args: RegexArgs) -> Result<ExitCode> {
	let rules = args
		.rules
		.iter()
		.map(String::as_str)
		.map(Rule::parse)
		.collect::<buildprop_cli::Result<Vec<_>>>()
		.context("Failed to parse --rule")?;

	let execution = Execution::MultiRegexpProperty(MultiRegexpProperty {
		property: args.property,
		value: args.value,
		no_rule_match_value: args.no_rule_match_value,
		rules,
		overwrite: !args.no_overwrite,
		..Default::default()
	});

	apply_executions([&execution], args.output.properties_file.as_deref())
}

fn handle_env(args: EnvArgs) -> Result<ExitCode> {
	let execution = Execution::EnvironmentProperty(EnvironmentProperty {
		property: args.property,
		variable: args.variable,
		value: args.value,
		no_exist_value: args.no_exist_value,
		overwrite: !args.no_overwrite,
		skip: false,
	});

	apply_executions([&execution], args.output.properties_file.as_deref())
}

fn handle_run(output: OutputArgs) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let merged =
		load_merged_config(&cwd, &ProcessEnvironment).context("Failed to load configuration")?;

	if merged.executions.is_empty() {
		warn!("No executions configured");
	}

	let properties_file = output.properties_file.or(merged.properties_file);
	apply_executions(
		merged.executions.iter().map(|e| &e.execution),
		properties_file.as_deref(),
	)
}

/// Run executions against a properties file, or print what they define.
fn apply_executions<'a>(
	executions: impl IntoIterator<Item = &'a Execution>,
	properties_file: Option<&Path>,
) -> Result<ExitCode> {
	let mut props = match properties_file {
		Some(path) => PropertyMap::load(path)?,
		None => PropertyMap::new(),
	};

	for execution in executions {
		let outcome = execute(execution, &mut props, &ProcessEnvironment).with_context(|| {
			format!(
				"{} failed for property '{}'",
				execution.goal_name(),
				execution.property()
			)
		})?;

		match outcome {
			Outcome::Defined { property, value } => {
				if properties_file.is_none() {
					println!("{}", format_entry(&property, &value));
				}
			}
			Outcome::Preserved { property, existing } => {
				info!("Keeping existing value of {property}: \"{existing}\"");
			}
			Outcome::Skipped => {}
		}
	}

	if let Some(path) = properties_file {
		props.save(path)?;
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd, &ProcessEnvironment)
		.context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		if let Some(ref env_var) = loaded.config.user_config_disable_env_var {
			println!("# user-config-disable-env-var: {}", env_var);
		}
		if let Some(ref file) = loaded.config.properties_file {
			println!("# properties-file: {}", file.display());
		}
		println!("# executions: {}", loaded.config.executions.len());
		println!();

		for (i, execution) in loaded.config.executions.iter().enumerate() {
			println!("  Execution {}: {}", i + 1, execution.goal_name());
			match execution {
				Execution::MultiRegexpProperty(goal) => print_multi_regexp(goal),
				Execution::EnvironmentProperty(goal) => print_environment(goal),
			}
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_multi_regexp(goal: &MultiRegexpProperty) {
	println!("    property: {}", goal.property);
	if let Some(ref value) = goal.value {
		println!("    value: {}", value);
	}
	if let Some(ref variable) = goal.value_from_env {
		println!("    value-from-env: {}", variable);
	}
	if let Some(ref fallback) = goal.no_rule_match_value {
		println!("    no-rule-match-value: {}", fallback);
	}
	println!("    overwrite: {}", goal.overwrite);
	if goal.skip {
		println!("    skip: true");
	}
	for (i, rule) in goal.rules.iter().enumerate() {
		println!(
			"    rule {}: {} -> {}",
			i + 1,
			rule.pattern(),
			rule.replacement().unwrap_or("")
		);
	}
}

fn print_environment(goal: &EnvironmentProperty) {
	println!("    property: {}", goal.property);
	println!("    variable: {}", goal.variable);
	println!("    value: {}", goal.value);
	println!("    no-exist-value: {}", goal.no_exist_value);
	println!("    overwrite: {}", goal.overwrite);
	if goal.skip {
		println!("    skip: true");
	}
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let configs = match discover_configs(&cwd, &ProcessEnvironment) {
		Ok(configs) => configs,
		Err(e) => {
			eprintln!("Configuration error: {:?}", anyhow::Error::from(e));
			return Ok(ExitCode::FAILURE);
		}
	};

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	let mut valid = true;
	for loaded in &configs {
		for execution in &loaded.config.executions {
			if let Execution::MultiRegexpProperty(goal) = execution
				&& !goal.skip
				&& let Err(e) = compile_rules(&goal.rules)
			{
				eprintln!(
					"Configuration error in {} (property '{}'): {}",
					loaded.path.display(),
					goal.property,
					e
				);
				valid = false;
			}
		}
	}

	if !valid {
		return Ok(ExitCode::FAILURE);
	}

	println!("All configuration files are valid:");
	for loaded in &configs {
		println!(
			"  {} ({} executions)",
			loaded.path.display(),
			loaded.config.executions.len()
		);
	}

	Ok(ExitCode::SUCCESS)
}
