mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{contacts, query, tags, transfer, Context};
use crate::error::{exit_code_for, report_error};
use connectsphere_config as config;
use connectsphere_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "connectsphere", version, about = "connectsphere contact book")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Add(contacts::AddArgs),
    Edit(contacts::EditArgs),
    Show(contacts::IdArgs),
    List(contacts::ListArgs),
    /// Toggle the favorite flag
    Favorite(contacts::IdArgs),
    Delete(contacts::IdArgs),
    /// Import raw records through normalization
    Import(transfer::ImportArgs),
    Export(transfer::ExportArgs),
    /// Print the remote query descriptor for a view
    Query(query::QueryArgs),
    Tags(tags::TagsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::Add(args) => contacts::add_contact(&ctx, args),
        Command::Edit(args) => contacts::edit_contact(&ctx, args),
        Command::Show(args) => contacts::show_contact(&ctx, args),
        Command::List(args) => contacts::list_contacts(&ctx, args),
        Command::Favorite(args) => contacts::toggle_favorite(&ctx, args),
        Command::Delete(args) => contacts::delete_contact(&ctx, args),
        Command::Import(args) => transfer::import_contacts(&ctx, args),
        Command::Export(args) => transfer::export_contacts(&ctx, args),
        Command::Query(args) => query::print_query(&ctx, args),
        Command::Tags(args) => tags::list_tags(&ctx, args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
