use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct GlobalArgs {
    /// Do not print any output.
    #[arg(global = true, long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use verbose output.
    #[arg(global = true, action = clap::ArgAction::Count, long, short, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Workspace root. Defaults to the current directory.
    #[arg(global = true, long, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,

    /// Sourcemap to load instead of the configured one, relative to the root.
    #[arg(global = true, long, value_name = "FILE")]
    pub sourcemap: Option<Utf8PathBuf>,
}
