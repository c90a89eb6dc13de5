//! Command-line interface definitions for `tn`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Parsed CLI arguments for `tn`.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tn")]
#[command(about = "Sweep a YAML document and build the components it describes")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Document to sweep and execute.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
    /// Print every sweep variant instead of executing it.
    #[arg(long)]
    pub sweep_only: bool,
    /// Raise the log level (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Do not mirror each document into the `CONFIG` environment variable.
    #[arg(long = "no-export-env")]
    pub should_skip_export: bool,
    /// Project maintenance commands.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands accepted by `tn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create `.tn.yaml` in the working directory.
    Init,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::{Cli, Command};

    #[rstest]
    fn parses_a_document_with_flags() {
        let cli = Cli::parse_from(["tn", "train.yaml", "--sweep-only", "-vv"]);
        assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("train.yaml")));
        assert!(cli.sweep_only);
        assert_eq!(cli.verbose, 2);
        assert!(cli.command.is_none());
    }

    #[rstest]
    fn init_is_a_subcommand() {
        let cli = Cli::parse_from(["tn", "init"]);
        assert_eq!(cli.command, Some(Command::Init));
        assert!(cli.file.is_none());
    }

    #[rstest]
    fn nothing_is_required() {
        let cli = Cli::parse_from(["tn"]);
        assert!(cli.file.is_none() && cli.command.is_none());
        assert!(!cli.should_skip_export);
    }
}
