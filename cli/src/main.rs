//! appdesk: operator CLI
//!
//! Drives the same `AdminService` a web route layer would, against the
//! store selected in `appdesk.toml` (or `--config`).
//!
//! Usage:
//!   appdesk submit --json '{"type":"helper","discordUsername":"ferris"}'
//!   appdesk --session "$ADMIN_SESSION_SECRET" list
//!   appdesk --session "$ADMIN_SESSION_SECRET" set-status --id <id> --status approved
//!   appdesk --session "$ADMIN_SESSION_SECRET" delete --id <id>
//!   appdesk --session "$ADMIN_SESSION_SECRET" audit --limit 20

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use appdesk_contracts::{
    admin::RequestMeta,
    audit::DEFAULT_AUDIT_LIMIT,
    error::{AppdeskError, AppdeskResult},
};
use appdesk_core::{AdminService, StatusChange, UpdateStatusRequest};

use crate::config::AppConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// appdesk: admin-gated application store.
#[derive(Parser)]
#[command(
    name = "appdesk",
    about = "Submit, review and audit applications",
    long_about = "Submit, review and audit applications stored in a pluggable\n\
                  document store (filesystem, GitHub gist, or in-memory)."
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Admin session token.
    #[arg(long, global = true, env = "APPDESK_SESSION", hide_env_values = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every application (admin).
    List,
    /// Submit a new application (public).
    Submit {
        /// Application body as inline JSON.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        json: Option<String>,
        /// Read the application body from a JSON file.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Change an application's status (admin).
    SetStatus {
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: String,
    },
    /// Delete an application (admin).
    Delete {
        #[arg(long)]
        id: Option<String>,
    },
    /// Show the most recent audit entries (admin).
    Audit {
        #[arg(long, default_value_t = DEFAULT_AUDIT_LIMIT)]
        limit: usize,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(if e.is_client_error() { 2 } else { 1 });
    }
}

fn run(cli: Cli) -> AppdeskResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let service = config.build_service()?;
    let session = cli.session.as_deref();

    match cli.command {
        Command::List => print_json(&service.list_applications(session)?),
        Command::Submit { json, file } => submit(&service, json, file),
        Command::SetStatus { id, status } => {
            let request = UpdateStatusRequest { id, status };
            let outcome = service.update_status(session, RequestMeta::default(), &request)?;
            print_json(&json!({
                "success": true,
                "updated": matches!(outcome, StatusChange::Updated { .. }),
            }))
        }
        Command::Delete { id } => {
            service.delete_application(session, RequestMeta::default(), id.as_deref())?;
            print_json(&json!({ "success": true }))
        }
        Command::Audit { limit } => print_json(&service.audit_logs(session, Some(limit))?),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn submit(service: &AdminService, json: Option<String>, file: Option<PathBuf>) -> AppdeskResult<()> {
    let raw = match (json, file) {
        (Some(raw), _) => raw,
        (None, Some(path)) => std::fs::read_to_string(&path).map_err(|e| AppdeskError::Validation {
            reason: format!("failed to read '{}': {}", path.display(), e),
        })?,
        (None, None) => {
            return Err(AppdeskError::Validation {
                reason: "either --json or --file is required".to_string(),
            })
        }
    };

    let payload: Value = serde_json::from_str(&raw).map_err(|e| AppdeskError::MalformedPayload {
        reason: format!("invalid JSON: {}", e),
    })?;

    let id = service.submit(payload)?;
    print_json(&json!({ "success": true, "id": id }))
}

fn print_json<T: Serialize>(value: &T) -> AppdeskResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| AppdeskError::Persistence {
        reason: format!("failed to render output: {}", e),
    })?;
    println!("{}", rendered);
    Ok(())
}
