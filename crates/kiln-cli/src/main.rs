//! Kiln binary entry point.

use clap::Parser;
use kiln_cli::cli::{Cli, Command};
use kiln_cli::error::cli_error_to_miette;
use kiln_cli::{commands, logger, ui};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let result = match args.command {
        Command::Dev(dev_args) => commands::dev::execute(dev_args).await,
        Command::Serve(serve_args) => commands::serve::execute(serve_args).await,
    };

    result.map_err(cli_error_to_miette)
}
