use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use tfbridge_manifest::BridgeToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to bridge.toml (defaults to ./bridge.toml)
    #[arg(short, long, default_value = "bridge.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let bridge_toml = BridgeToml::open(&self.config).unwrap_or_exit();

        let report = ops::check(bridge_toml.manifest(), &self.config);
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
