use anyhow::Result;
use clap::Parser;

use crate::args::Args;
use crate::commands::Command;
use crate::commands::LurkCommand;
use crate::exit::Exit;

/// Resolve Luau modules the way the language server sees them.
#[derive(Parser)]
#[command(name = "lurk")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: LurkCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub fn run(args: Vec<String>) -> Result<Exit> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    let _guard = crate::logging::init_tracing(&cli.args.global);

    cli.command.execute(&cli.args)
}
