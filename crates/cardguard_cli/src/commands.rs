//! Command dispatch for the `cardguard` binary.
//!
//! # Responsibility
//! - Resolve configuration and logging once, before any command runs.
//! - `submit` validates before any schema work and always answers with a
//!   response envelope; failure causes go to the log, never to stdout.

use crate::args::{Cli, Command, SubmitArgs};
use cardguard_core::db::open_db;
use cardguard_core::{
    core_version, ensure_schema, init_logging, init_stderr_logging, submit_card_with_init,
    AppConfig, CardId, CardRepository, SqliteCardRepository, SubmissionForm,
};
use log::info;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// Parses arguments, prepares the process and runs one command.
pub fn run(cli: Cli) -> CliResult<ExitCode> {
    let config = resolve_config(&cli)?;
    match config.log_dir.as_deref() {
        Some(log_dir) => init_logging(&config.log_level, log_dir)?,
        None => init_stderr_logging(&config.log_level)?,
    }

    match cli.command {
        Command::Init => run_init(&config),
        Command::Submit(args) => run_submit(&config, args),
        Command::Show { id } => run_show(&config, id),
        Command::Config => run_config(&config),
    }
}

fn resolve_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(db_path) = &cli.db_path {
        config.db_path = db_path.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    Ok(config)
}

fn run_init(config: &AppConfig) -> CliResult<ExitCode> {
    ensure_schema(&config.db_path)?;
    info!("event=cli_init module=cli status=ok");
    println!("schema ready at {}", config.db_path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_submit(config: &AppConfig, args: SubmitArgs) -> CliResult<ExitCode> {
    let form = match &args.json {
        Some(source) => read_form_json(source)?,
        None => SubmissionForm {
            holder_name: args.holder_name,
            card_number: args.card_number,
            expiry: args.expiry,
            cvv: args.cvv,
            card_password: args.card_password,
        },
    };

    let response = submit_card_with_init(&config.db_path, &form);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_show(config: &AppConfig, id: CardId) -> CliResult<ExitCode> {
    let mut conn = open_db(&config.db_path)?;
    let repo = SqliteCardRepository::new(&mut conn);
    let Some(card) = repo.get_card(id)? else {
        eprintln!("card {id} not found");
        return Ok(ExitCode::FAILURE);
    };

    let view = json!({
        "id": card.id,
        "holder_name": card.holder_name,
        "card_number": card.masked_number(),
        "expiry": card.expiry,
        "created_at": card.created_at,
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(ExitCode::SUCCESS)
}

fn run_config(config: &AppConfig) -> CliResult<ExitCode> {
    let view = json!({
        "core_version": core_version(),
        "config": config,
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(ExitCode::SUCCESS)
}

fn read_form_json(source: &Path) -> CliResult<SubmissionForm> {
    let raw = if source.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&raw)?)
}
