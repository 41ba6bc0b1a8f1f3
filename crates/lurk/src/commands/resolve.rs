use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use lurk_resolver::FileResolver;
use lurk_resolver::ModuleInfo;
use lurk_resolver::RequireExpr;

use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Resolve {
    /// The require argument: a string such as `./util` or `@pkg/promise`, or
    /// an instance path such as `script.Parent.util`.
    require: String,

    /// File the require appears in. Without it the require is resolved from
    /// the workspace root.
    #[arg(long, value_name = "FILE")]
    from: Option<Utf8PathBuf>,
}

impl Command for Resolve {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let workspace = super::load_workspace(&args.global)?;
        let resolver = workspace.resolver();

        let context = match &self.from {
            Some(file) => Some(ModuleInfo::new(
                resolver.module_name_for_path(&super::absolute(file)?),
            )),
            None => None,
        };
        let expr = RequireExpr::parse_instance_path(&self.require)
            .unwrap_or_else(|| RequireExpr::string(self.require.as_str()));

        let Some(module) = resolver.resolve_module(context.as_ref(), &expr) else {
            return Ok(Exit::error().with_message(format!(
                "Could not resolve `{}`",
                self.require
            )));
        };

        let optional = if module.optional { " (optional)" } else { "" };
        println!(
            "{}\t{}{optional}",
            module.name,
            resolver.human_readable_name(&module.name)
        );
        Ok(Exit::success())
    }
}
