use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Config {
    file: Utf8PathBuf,
}

impl Command for Config {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let workspace = super::load_workspace(&args.global)?;
        let resolver = workspace.resolver();
        let name = resolver.module_name_for_path(&super::absolute(&self.file)?);

        let config = resolver.get_config(&name);
        let json = serde_json::to_string_pretty(&*config).context("Failed to serialize config")?;
        println!("{json}");
        Ok(Exit::success())
    }
}
