//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Organizational hierarchy viewer: parent-pointer records as an expandable tree
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.orgtree.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the records come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Hierarchy file (.json or .toml); default: `source` from config
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Use the built-in sample hierarchy
    #[arg(long, conflicts_with = "file")]
    pub sample: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the hierarchy as a tree
    Tree {
        #[command(flatten)]
        source: SourceArgs,

        /// Toggle node(s) by identifier before rendering, in order
        #[arg(short, long = "toggle", value_name = "ID")]
        toggle: Vec<String>,

        /// Expand every node
        #[arg(short, long, conflicts_with = "toggle")]
        all: bool,

        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// List root nodes and why they are roots
    Roots {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Report dangling parents, self references, cycles and unknown types
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Fail if a parent cycle had to be cut
        #[arg(long)]
        strict: bool,
    },

    /// Print the built-in sample hierarchy as JSON
    Sample,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}
