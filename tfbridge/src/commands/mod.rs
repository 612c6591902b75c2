mod check;
mod completions;
mod inspect;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use inspect::InspectCommand;

/// Prints a diagnostic with its source snippet and exits with status 1.
fn exit_with(report: miette::Report) -> ! {
    eprintln!("{:?}", report);
    std::process::exit(1)
}

/// Turns a diagnostic error into a process exit instead of an eyre chain.
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for tfbridge_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| exit_with(miette::Report::new(*e)))
    }
}

impl<T> UnwrapOrExit<T> for Result<T, tfbridge_core::InfoError> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| exit_with(miette::Report::new(e)))
    }
}

#[derive(Parser)]
#[command(name = "tfbridge")]
#[command(version)]
#[command(about = "Inspect and validate bridged provider overlays")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Check(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate bridge.toml
    Check(CheckCommand),

    /// Show the property names and types of persisted provider metadata
    Inspect(InspectCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
