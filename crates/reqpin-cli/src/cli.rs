//! CLI argument definitions for reqpin.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "reqpin",
    version,
    about = "Compile requirements and constraints into a pinned requirements list",
    long_about = "reqpin merges requirement specs, requirements files and constraints files \
                  into one pinned list. Constraints bound versions without being installed \
                  until a real requirement names them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile inputs into a pinned requirements list
    Compile {
        #[command(flatten)]
        inputs: InputArgs,
        /// Write the pinned list to this file ("-" for stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<String>,
        /// Write the dependency graph as JSON to this file ("-" for stdout)
        #[arg(short = 'j', long, value_name = "PATH")]
        json_output: Option<String>,
    },

    /// Display the dependency tree of the compiled inputs
    Tree {
        #[command(flatten)]
        inputs: InputArgs,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Explain why a package is included
        #[arg(long, value_name = "NAME")]
        why: Option<String>,
    },
}

/// Inputs shared by every command that runs a merge session.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Requirement specs, e.g. "flask>=3" or a VCS URL
    pub specs: Vec<String>,
    /// Constrain versions using the given constraints file
    #[arg(short, long = "constraint", value_name = "FILE")]
    pub constraints: Vec<PathBuf>,
    /// Install from the given requirements file
    #[arg(short, long = "requirement", value_name = "FILE")]
    pub requirements: Vec<PathBuf>,
    /// Install a project in editable mode from a local path or VCS URL
    #[arg(short, long = "editable", value_name = "PATH/URL")]
    pub editables: Vec<String>,
    /// Package index used to discover dependencies
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
    /// Don't discover dependencies
    #[arg(long)]
    pub flat: bool,
    /// Allow repeated top-level requirements (requires -c)
    #[arg(long)]
    pub allow_double: bool,
}

/// Parse command-line arguments.
pub fn parse() -> Cli {
    Cli::parse()
}
