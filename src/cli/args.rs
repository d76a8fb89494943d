//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract (and optionally mangle) translation keys
//! - `init`: Initialize keymangle configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write rewritten sources back to disk (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Mangle keys into short identifiers (overrides config file)
    #[arg(long)]
    pub mangle: bool,

    /// Output path template; supports [name] and [chunk] (overrides config file)
    #[arg(short, long, env = "KEYMANGLE_OUTPUT")]
    pub output: Option<String>,

    /// Run name substituted for [name] (overrides config file)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Source roots, each processed as an independent run (default: sourceRoot)
    pub roots: Vec<PathBuf>,
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translation keys and write key mappings
    Extract(ExtractCommand),
    /// Initialize a new .keymanglerc.json configuration file
    Init,
}
