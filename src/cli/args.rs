//! Command-line argument parsing for the pointwatch CLI.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Show who is signed in
    Status,
    /// Sign in with email and password
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// List a user's monitoring points
    ListPoints { user_id: String },
    /// Append a point (JSON file) to a machine (JSON file)
    CreatePoint {
        machine_file: PathBuf,
        point_file: PathBuf,
    },
    /// Remove a point from a machine
    DeletePoint { machine_id: String, point_id: String },
    /// Arguments that do not form a command
    Invalid(String),
}

/// Parsed command line: the command plus global flags.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: CliCommand,
    /// Number of `-v`/`--verbose` flags
    pub verbosity: u8,
}

/// Parse command-line arguments.
///
/// The first item is the program name and is skipped. `--version` and
/// `--help` win wherever they appear.
///
/// # Examples
///
/// ```
/// use pointwatch::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["pointwatch".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliArgs
where
    I: Iterator<Item = String>,
{
    let mut verbosity = 0u8;
    let mut positional = Vec::new();

    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return CliArgs::new(CliCommand::Version, verbosity),
            "--help" | "-h" => return CliArgs::new(CliCommand::Help, verbosity),
            "--verbose" | "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return CliArgs::new(
                    CliCommand::Invalid(format!("unknown flag: {}", flag)),
                    verbosity,
                )
            }
            _ => positional.push(arg),
        }
    }

    CliArgs::new(parse_command(&positional), verbosity)
}

impl CliArgs {
    fn new(command: CliCommand, verbosity: u8) -> Self {
        Self { command, verbosity }
    }
}

fn parse_command(args: &[String]) -> CliCommand {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] | ["help"] => CliCommand::Help,
        ["version"] => CliCommand::Version,
        ["status"] => CliCommand::Status,
        ["login", email, password] => CliCommand::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ["logout"] => CliCommand::Logout,
        ["points", "list", user_id] => CliCommand::ListPoints {
            user_id: user_id.to_string(),
        },
        ["points", "create", machine, point] => CliCommand::CreatePoint {
            machine_file: PathBuf::from(machine),
            point_file: PathBuf::from(point),
        },
        ["points", "delete", machine_id, point_id] => CliCommand::DeletePoint {
            machine_id: machine_id.to_string(),
            point_id: point_id.to_string(),
        },
        ["login", ..] => CliCommand::Invalid("usage: login <email> <password>".to_string()),
        ["points", "list", ..] => {
            CliCommand::Invalid("usage: points list <userId>".to_string())
        }
        ["points", "create", ..] => CliCommand::Invalid(
            "usage: points create <machine.json> <point.json>".to_string(),
        ),
        ["points", "delete", ..] => {
            CliCommand::Invalid("usage: points delete <machineId> <pointId>".to_string())
        }
        [other, ..] => CliCommand::Invalid(format!("unknown command: {}", other)),
    }
}
