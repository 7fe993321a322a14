use color_eyre::Result;

use pointwatch::cli::{parse_args, run_cli_command};
use pointwatch::logging::{init_logging, level_for_verbosity};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = parse_args(std::env::args());
    init_logging(level_for_verbosity(args.verbosity));

    run_cli_command(args.command).await
}
