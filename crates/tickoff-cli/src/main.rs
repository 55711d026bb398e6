//! tickoff - run commands at most once per period
//!
//! Wraps an arbitrary command behind a persisted last-done token:
//! if the token is still valid the command is skipped; if it has
//! expired the command runs, and a successful exit commits a fresh
//! token.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::process::{Command as ProcessCommand, ExitCode, ExitStatus};
use thiserror::Error;
use tickoff_core::{GuardError, Period, Tick};
use tickoff_store::{FileStore, TokenStore};
use tickoff_util::{format_duration, parse_duration, resolve_token_path};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Durable last-done markers for throttling recurring commands
#[derive(Parser, Debug)]
#[command(name = "tickoff")]
#[command(about = "Run commands at most once per period", long_about = None)]
struct Args {
    /// Log level (or set RUST_LOG)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run a command unless it already ran within the period
    Run {
        /// Token name or path (bare names resolve under the state dir)
        #[arg(short, long)]
        token: String,

        /// Period: a duration like 30s/15m/2h/1d, or one of
        /// today/this-week/this-month
        #[arg(short, long)]
        every: String,

        /// Command and arguments to run
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Show the stored token. Exits 0 when valid, 1 when expired.
    Status {
        /// Token name or path (bare names resolve under the state dir)
        #[arg(short, long)]
        token: String,
    },
}

/// Failure of the guarded command itself
#[derive(Debug, Error)]
enum RunError {
    #[error("failed to launch command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("command exited with {0}")]
    Failed(ExitStatus),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Cmd::Run {
            token,
            every,
            command,
        } => cmd_run(&token, &every, &command),
        Cmd::Status { token } => cmd_status(&token),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_run(token: &str, every: &str, command: &[String]) -> Result<ExitCode> {
    let period = parse_period(every)?;
    let path = resolve_token_path(token);
    debug!(path = %path.display(), "Using token file");

    let mut tick = Tick::open(&path, period)
        .with_context(|| format!("Failed to load token at {}", path.display()))?;

    match tick.run(|| run_command(command)) {
        Ok(Some(())) => Ok(ExitCode::SUCCESS),
        Ok(None) => {
            let left = (tick.token().expires_on() - Local::now())
                .to_std()
                .unwrap_or_default();
            eprintln!(
                "tickoff: token still valid for {}, skipping",
                format_duration(left)
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(GuardError::Action(RunError::Failed(status))) => {
            eprintln!("tickoff: {}", RunError::Failed(status));
            let code = status
                .code()
                .and_then(|c| u8::try_from(c).ok())
                .map(ExitCode::from)
                .unwrap_or(ExitCode::FAILURE);
            Ok(code)
        }
        Err(GuardError::Action(RunError::Spawn(e))) => {
            Err(e).with_context(|| format!("Failed to launch {:?}", command[0]))
        }
        Err(GuardError::Store(e)) => {
            Err(e).with_context(|| format!("Failed to update token at {}", path.display()))
        }
    }
}

fn cmd_status(token: &str) -> Result<ExitCode> {
    let path = resolve_token_path(token);
    let store = FileStore::new(&path);
    let record = store
        .load()
        .with_context(|| format!("Failed to load token at {}", path.display()))?;

    let now = Local::now();
    println!("Token: {}", path.display());
    println!("  Created: {}", record.created_on().format("%Y-%m-%d %H:%M:%S"));
    println!("  Expires: {}", record.expires_on().format("%Y-%m-%d %H:%M:%S"));

    if record.is_valid(now) {
        let left = (record.expires_on() - now).to_std().unwrap_or_default();
        println!("  Status: valid for another {}", format_duration(left));
        Ok(ExitCode::SUCCESS)
    } else {
        let over = (now - record.expires_on()).to_std().unwrap_or_default();
        println!("  Status: expired {} ago", format_duration(over));
        Ok(ExitCode::from(1))
    }
}

fn parse_period(s: &str) -> Result<Period> {
    match s {
        "today" => Ok(Period::Today),
        "this-week" => Ok(Period::ThisWeek),
        "this-month" => Ok(Period::ThisMonth),
        _ => parse_duration(s).map(Period::ValidFor).ok_or_else(|| {
            anyhow!(
                "Invalid period '{s}': expected a duration like 30s/15m/2h/1d, \
                 or one of today/this-week/this-month"
            )
        }),
    }
}

fn run_command(command: &[String]) -> Result<(), RunError> {
    let Some((program, args)) = command.split_first() else {
        return Err(RunError::Spawn(std::io::Error::other("empty command")));
    };

    let status = ProcessCommand::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(RunError::Failed(status))
    }
}
