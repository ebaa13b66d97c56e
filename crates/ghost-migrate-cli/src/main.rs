//! ghost-migrate CLI - derive and check the objects of an online schema migration.

use clap::{Parser, Subcommand};
use ghost_migrate::{ConfigFile, MigrateError, MigrationConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "ghost-migrate")]
#[command(about = "Online MySQL schema migration via a ghost table")]
#[command(version)]
struct Cli {
    /// Path to INI config file ([client] and [osc] sections)
    #[arg(short, long)]
    conf: Option<PathBuf>,

    /// Database of the table to migrate
    #[arg(long)]
    database: Option<String>,

    /// Table to migrate
    #[arg(short, long)]
    table: Option<String>,

    /// Base name for the ghost, changelog and old tables instead of the table name
    #[arg(long)]
    force_table_names: Option<String>,

    /// Embed the migration start time in the old table name
    #[arg(long)]
    timestamp_old_table: bool,

    /// Suffix for ghost trigger names
    #[arg(long, default_value = "_gho")]
    trigger_suffix: String,

    /// Strip the trigger suffix from names that already end with it
    #[arg(long)]
    remove_trigger_suffix_if_exists: bool,

    /// MySQL user (overrides [client] user)
    #[arg(long)]
    user: Option<String>,

    /// MySQL password (overrides [client] password)
    #[arg(long)]
    password: Option<String>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ghost, changelog and old table names and ghost trigger names
    Names {
        /// Original trigger name (repeatable)
        #[arg(long = "trigger")]
        triggers: Vec<String>,
    },

    /// Read the config file and print its settings
    CheckConfig,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(MigrateError::Config)?;

    match cli.command {
        Commands::Names { ref triggers } => {
            let config = build_config(&cli)?;
            info!("Deriving names for table {}", config.original_table_name());

            let tables = config.table_names();
            let ghost_triggers = config.check_ghost_triggers(triggers.as_slice())?;

            if cli.output_json {
                let pairs: Vec<_> = triggers
                    .iter()
                    .zip(&ghost_triggers)
                    .map(|(original, ghost)| serde_json::json!({ "original": original, "ghost": ghost }))
                    .collect();
                let output = serde_json::json!({ "tables": tables, "triggers": pairs });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Ghost table:     {}", tables.ghost);
                println!("Changelog table: {}", tables.changelog);
                println!("Old table:       {}", tables.old);
                for (original, ghost) in triggers.iter().zip(&ghost_triggers) {
                    println!("Trigger:         {} -> {}", original, ghost);
                }
            }
        }

        Commands::CheckConfig => {
            let path = cli
                .conf
                .as_ref()
                .ok_or_else(|| MigrateError::Config("--conf is required".to_string()))?;
            let file = ConfigFile::load(path)?;
            info!("Loaded configuration from {:?}", path);

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                println!("Config file: {}", path.display());
                println!("  user: {}", file.client.user);
                println!(
                    "  password: {}",
                    if file.client.password.is_empty() { "(not set)" } else { "[REDACTED]" }
                );
                println!("  chunk_size: {}", file.osc.chunk_size);
                println!("  max_lag_millis: {}", file.osc.max_lag_millis);
                println!("  replication_lag_query: {}", file.osc.replication_lag_query);
                println!("  max_load: {}", file.osc.max_load);
            }
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<MigrationConfig, MigrateError> {
    let mut builder = MigrationConfig::builder()
        .timestamp_old_table(cli.timestamp_old_table)
        .trigger_suffix(cli.trigger_suffix.clone())
        .remove_trigger_suffix(cli.remove_trigger_suffix_if_exists);

    if let Some(ref table) = cli.table {
        builder = builder.original_table_name(table.clone());
    }
    if let Some(ref db) = cli.database {
        builder = builder.database_name(db.clone());
    }
    if let Some(ref name) = cli.force_table_names {
        builder = builder.force_table_name(name.clone());
    }
    if let Some(ref path) = cli.conf {
        builder = builder.config_file(path.clone());
    }
    if let Some(ref user) = cli.user {
        builder = builder.user(user.clone());
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }

    builder.build()
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
