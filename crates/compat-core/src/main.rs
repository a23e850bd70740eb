use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use compat_core::demo::{self, DEMO_DAG_VERSION_ID, DEMO_TASK_ID};
use compat_core::{CompatConfig, CompatError};
use compat_payload::TaskInstanceV11;
use compat_versioning::MigrationRegistry;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("compat-demo")
        .version(compat_core::VERSION)
        .about("Serve versioned task-instance payloads to older clients")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Migrate a server task instance to a client version and resolve defaults")
                .arg(
                    Arg::new("client-version")
                        .long("client-version")
                        .default_value("1.0")
                        .help("Schema version the client expects"),
                )
                .arg(
                    Arg::new("server-version")
                        .long("server-version")
                        .help("Schema version the server produces (overrides config)"),
                )
                .arg(
                    Arg::new("task-id")
                        .long("task-id")
                        .default_value(DEMO_TASK_ID)
                        .help("Task id of the simulated instance"),
                )
                .arg(
                    Arg::new("dag-version-id")
                        .long("dag-version-id")
                        .default_value("101")
                        .value_parser(value_parser!(i64))
                        .help("DAG version id carried by the 1.1 payload"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Config file (.toml, .yaml, .yml, .json); demo layers when omitted"),
                )
                .arg(
                    Arg::new("explain")
                        .long("explain")
                        .action(ArgAction::SetTrue)
                        .help("Show which source supplied each resolved field"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("List built-in migration rules")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn simulate(registry: &MigrationRegistry, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => CompatConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => demo::demo_config(),
    };
    if let Some(server) = args.get_one::<String>("server-version") {
        config.server_version = server.as_str().into();
    }

    let client_version = args
        .get_one::<String>("client-version")
        .map_or("1.0", String::as_str);
    let task_id = args
        .get_one::<String>("task-id")
        .map_or(DEMO_TASK_ID, String::as_str);
    let dag_version_id = args
        .get_one::<i64>("dag-version-id")
        .copied()
        .unwrap_or(DEMO_DAG_VERSION_ID);

    let task = TaskInstanceV11::new(task_id).with_dag_version_id(dag_version_id);

    let resolved = match demo::simulate_request_traced(registry, config, client_version, &task) {
        Ok(resolved) => resolved,
        Err(err @ CompatError::Incompatible { .. }) => {
            eprintln!("[Compatibility failure] {err}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if args.get_flag("json") {
        println!("{}", resolved.values.to_json()?);
    } else {
        println!("[Response for SDK v{client_version}] {}", resolved.values.to_json()?);
    }

    if args.get_flag("explain") {
        for (field, value) in resolved.values.iter() {
            let source = resolved
                .source_of(field)
                .map_or_else(|| "unknown".to_string(), |s| s.to_string());
            let value = value.to_string();
            println!("  {field:<16} {value:<20} from {source}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn rules(registry: &MigrationRegistry, args: &ArgMatches) -> anyhow::Result<ExitCode> {
    if args.get_flag("json") {
        let listing: Vec<_> = registry
            .changes()
            .into_iter()
            .map(|c| {
                serde_json::json!({
                    "from_version": c.origin_version(),
                    "to_version": c.target_version(),
                    "description": c.description(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        println!("Registered migration rules ({}):", registry.len());
        for change in registry.changes() {
            println!("  {}: {}", change.key(), change.description());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run() -> anyhow::Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let registry =
        MigrationRegistry::with_builtin_rules().context("failed to register built-in rules")?;

    match matches.subcommand() {
        Some(("simulate", args)) => simulate(&registry, args),
        Some(("rules", args)) => rules(&registry, args),
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn simulate_defaults_parse() {
        let matches = cli().try_get_matches_from(["compat-demo", "simulate"]).unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "simulate");
        assert_eq!(args.get_one::<String>("client-version").map(String::as_str), Some("1.0"));
        assert_eq!(args.get_one::<i64>("dag-version-id").copied(), Some(101));
        assert!(!args.get_flag("json"));
    }

    #[test]
    fn global_log_flag_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["compat-demo", "rules", "--log-json"])
            .unwrap();
        assert!(matches.get_flag("log-json"));
    }

    #[test]
    fn simulate_same_version_client() {
        let registry = MigrationRegistry::with_builtin_rules().unwrap();
        let matches = cli()
            .try_get_matches_from(["compat-demo", "simulate", "--client-version", "1.1", "--json"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(simulate(&registry, args).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn simulate_explain_for_old_client() {
        let registry = MigrationRegistry::with_builtin_rules().unwrap();
        let matches = cli()
            .try_get_matches_from(["compat-demo", "simulate", "--explain", "--task-id", "load"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(args.get_flag("explain"));
        assert_eq!(simulate(&registry, args).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn simulate_unknown_client_fails_cleanly() {
        let registry = MigrationRegistry::with_builtin_rules().unwrap();
        let matches = cli()
            .try_get_matches_from(["compat-demo", "simulate", "--client-version", "0.1"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(simulate(&registry, args).unwrap(), ExitCode::FAILURE);
    }
}
