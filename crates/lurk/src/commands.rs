mod config;
mod module_name;
mod read;
mod resolve;

use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Subcommand;
use lurk_conf::Settings;
use lurk_resolver::Workspace;
use lurk_source::OsFileSystem;

use crate::args::Args;
use crate::args::GlobalArgs;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &Args) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum LurkCommand {
    /// Resolve a require from a file
    Resolve(self::resolve::Resolve),
    /// Print the module name of a file
    ModuleName(self::module_name::ModuleName),
    /// Print the source of a module as the type checker reads it
    Read(self::read::Read),
    /// Print the effective `.luaurc` configuration for a file
    Config(self::config::Config),
}

impl Command for LurkCommand {
    fn execute(&self, args: &Args) -> Result<Exit> {
        match self {
            Self::Resolve(command) => command.execute(args),
            Self::ModuleName(command) => command.execute(args),
            Self::Read(command) => command.execute(args),
            Self::Config(command) => command.execute(args),
        }
    }
}

/// Load the workspace the global arguments point at, with its sourcemap.
fn load_workspace(args: &GlobalArgs) -> Result<Workspace> {
    let root = match &args.root {
        Some(root) => absolute(root)?,
        None => current_dir()?,
    };

    let mut settings = Settings::new(&root).context("Failed to load settings")?;
    if let Some(sourcemap) = &args.sourcemap {
        settings.sourcemap.enabled = true;
        settings.sourcemap.file = absolute(sourcemap)?;
    }

    let workspace = Workspace::new(&root, settings, Arc::new(OsFileSystem));
    let loaded = workspace
        .reload_sourcemap()
        .context("Failed to load sourcemap")?;
    tracing::debug!(%root, loaded, "workspace ready");
    Ok(workspace)
}

/// `path` made absolute against the current directory.
fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(lurk_source::normalize_path(path));
    }
    Ok(lurk_source::normalize_path(&current_dir()?.join(path)))
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| anyhow::anyhow!("Current directory is not valid UTF-8"))
}
