use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct ModuleName {
    file: Utf8PathBuf,
}

impl Command for ModuleName {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let workspace = super::load_workspace(&args.global)?;
        let path = super::absolute(&self.file)?;
        println!("{}", workspace.resolver().module_name_for_path(&path));
        Ok(Exit::success())
    }
}
