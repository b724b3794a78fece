//! `crm` command line entry point.
//!
//! # Responsibility
//! - Resolve config from file and flags, open the database, dispatch.
//! - Map core errors to `error[<code>]: <message>` and a non-zero exit.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use crm_core::{init_logging_from_config, CoreError, CrmConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CoreError>() {
                Some(core) => eprintln!("error[{}]: {}", core.error_code(), core),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;

    init_logging_from_config(&config).context("failed to start logging")?;

    let mut conn = crm_core::db::open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    log::info!(
        "event=cli_start module=cli db_path={} json={}",
        config.db_path.display(),
        cli.json
    );

    commands::dispatch(&mut conn, cli.command, cli.json)
}

fn resolve_config(cli: &Cli) -> anyhow::Result<CrmConfig> {
    let mut config = match cli.config.as_ref() {
        Some(path) => CrmConfig::load(path)?,
        None => CrmConfig::default(),
    };
    if let Some(db) = cli.db.as_ref() {
        config.db_path = db.clone();
    }
    if let Some(level) = cli.log_level.as_ref() {
        config.log_level = level.clone();
    }
    if let Some(dir) = cli.log_dir.as_ref() {
        config.log_dir = Some(absolute(dir)?);
    }
    Ok(config)
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot resolve current directory")?;
    Ok(cwd.join(path))
}
