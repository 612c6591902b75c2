use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use tfbridge_core::MarshallableProviderInfo;
use tfbridge_shim::CallContext;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InspectCommand {
    /// Provider metadata written by the bridge (JSON)
    pub metadata: PathBuf,

    /// Only show this resource or data source
    #[arg(short, long)]
    pub resource: Option<String>,
}

impl InspectCommand {
    pub fn run(&self) -> Result<()> {
        let json = std::fs::read_to_string(&self.metadata)
            .wrap_err_with(|| format!("failed to read '{}'", self.metadata.display()))?;
        let info = MarshallableProviderInfo::from_json(&json)
            .unwrap_or_exit()
            .to_info();

        let cx = CallContext::new("inspect");
        let report = ops::inspect(&info, &cx, self.resource.as_deref()).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
