//! CLI module for pointwatch.
//!
//! Parses arguments and runs one command against the backend. Session
//! cookies persist in the cookie jar between invocations, so `login` once
//! and later commands reuse (and silently refresh) the session.
//!
//! ```ignore
//! use pointwatch::cli::{parse_args, run_cli_command};
//!
//! let args = parse_args(std::env::args());
//! run_cli_command(args.command).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliArgs, CliCommand};
pub use version::{version_line, VERSION};

use std::path::Path;

use color_eyre::eyre::{bail, WrapErr};
use color_eyre::{Report, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{AuthProvider, SessionState, SignInCredentials};
use crate::client::PointwatchClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, AuthError};
use crate::monitoring::{Machine, MonitoringPoint};

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: pointwatch [-v] <command>

Commands:
  status                                    Show the signed-in user
  login <email> <password>                  Sign in
  logout                                    Sign out
  points list <userId>                      List a user's monitoring points
  points create <machine.json> <point.json> Append a point to a machine
  points delete <machineId> <pointId>       Remove a point from a machine

Options:
  -v, --verbose   More logging (repeatable)
  -V, --version   Print version
  -h, --help      Print this help

Environment:
  POINTWATCH_API_URL, POINTWATCH_ENV, POINTWATCH_SETTLE_DELAY_MS,
  POINTWATCH_TIMEOUT_SECS, POINTWATCH_COOKIE_PATH";

/// Run a command, printing its output to stdout.
///
/// The API client is only built for commands that talk to the backend.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    let output = match command {
        CliCommand::Version => version_line(),
        CliCommand::Help => USAGE.to_string(),
        CliCommand::Invalid(message) => bail!("{}\n\n{}", message, USAGE),
        command => {
            let client = PointwatchClient::from_config(ClientConfig::from_env())
                .wrap_err("Failed to set up the API client")?;
            execute(command, &client).await?
        }
    };
    println!("{}", output);
    Ok(())
}

/// Run a command against `client` and return what it would print.
pub async fn execute(command: CliCommand, client: &PointwatchClient) -> Result<String> {
    match command {
        CliCommand::Version => Ok(version_line()),
        CliCommand::Help => Ok(USAGE.to_string()),
        CliCommand::Invalid(message) => bail!("{}\n\n{}", message, USAGE),
        CliCommand::Status => {
            let (_provider, state) = hydrate(client).await;
            Ok(describe(&state))
        }
        CliCommand::Login { email, password } => {
            let (provider, _) = hydrate(client).await;
            let context = provider.context();
            let credentials = SignInCredentials::new(email, password);
            context
                .sign_in(&credentials)
                .await
                .map_err(|e| auth_failure("Sign-in failed", e))?;
            Ok(describe(&context.state()))
        }
        CliCommand::Logout => {
            let (provider, _) = hydrate(client).await;
            provider
                .context()
                .sign_out()
                .await
                .map_err(|e| auth_failure("Sign-out failed", e))?;
            Ok("Signed out".to_string())
        }
        CliCommand::ListPoints { user_id } => {
            let (_provider, _) = hydrate(client).await;
            let points = client
                .points()
                .list_points(&user_id)
                .await
                .map_err(|e| api_failure("Failed to list monitoring points", e))?;
            to_pretty_json(&points)
        }
        CliCommand::CreatePoint {
            machine_file,
            point_file,
        } => {
            let machine: Machine = read_json(&machine_file).await?;
            let point: MonitoringPoint = read_json(&point_file).await?;
            let (_provider, _) = hydrate(client).await;
            let saved = client
                .points()
                .create_point(&machine, point)
                .await
                .map_err(|e| api_failure("Failed to create monitoring point", e))?;
            to_pretty_json(&saved)
        }
        CliCommand::DeletePoint {
            machine_id,
            point_id,
        } => {
            let (_provider, _) = hydrate(client).await;
            let saved = client
                .points()
                .delete_point(&machine_id, &point_id)
                .await
                .map_err(|e| api_failure("Failed to delete monitoring point", e))?;
            to_pretty_json(&saved)
        }
    }
}

/// Mount the session and wait for it to hydrate, refreshing the access
/// token if needed.
async fn hydrate(client: &PointwatchClient) -> (AuthProvider, SessionState) {
    let mut provider = client.mount();
    let state = provider.ready().await;
    (provider, state)
}

fn describe(state: &SessionState) -> String {
    match &state.user {
        Some(user) => match &user.email {
            Some(email) => format!("Signed in as {} <{}>", user.id, email),
            None => format!("Signed in as {}", user.id),
        },
        None => "Not signed in".to_string(),
    }
}

fn auth_failure(context: &str, err: AuthError) -> Report {
    let message = format!("{}: {}", context, err.user_message());
    Report::new(err).wrap_err(message)
}

fn api_failure(context: &str, err: ApiError) -> Report {
    let message = format!("{}: {}", context, err.user_message());
    Report::new(err).wrap_err(message)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("Invalid JSON in {}", path.display()))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).wrap_err("Failed to format response")
}
