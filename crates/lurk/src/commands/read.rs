use anyhow::Result;
use camino::Utf8Path;
use clap::Parser;
use lurk_sourcemap::is_virtual_path;

use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Read {
    /// A virtual path such as `game/ReplicatedStorage/Shared`, or a file.
    module: String,
}

impl Command for Read {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let workspace = super::load_workspace(&args.global)?;
        let name = if is_virtual_path(&self.module) {
            self.module.clone()
        } else {
            super::absolute(Utf8Path::new(&self.module))?.into_string()
        };

        let Some(source) = workspace.resolver().read_source(&name) else {
            return Ok(Exit::error().with_message(format!("No source for `{}`", self.module)));
        };

        println!("-- {} ({:?})", source.display_name, source.kind);
        println!("{}", source.source);
        Ok(Exit::success())
    }
}
