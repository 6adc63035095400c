//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for taglens using the `clap` crate.
//!
//! # Commands
//!
//! - **list**: resolve the export list for a selection (default output: `./path` lines)
//! - **tags**: show tag coverage over a selection
//! - **edit**: add or delete tags across a selection and write them back
//! - **importers**: show which files import a package
//! - **config**: create or show the project configuration
//!
//! # Selections
//!
//! `list`, `tags` and `edit` build their selection from `--from FILE` (an
//! exported list, globs allowed) and any number of `--tag SPEC` level specs
//! of the form `category[:group[:module[:label]]]`, with `_` for an omitted
//! group or module.
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use taglens::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["taglens", "list", "--tag", "focus:_:_:x", "--depth", "2"]);
//! assert!(matches!(cli.command, Commands::List { .. }));
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::expand::ExpansionDepth;

/// Output format for the list command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `./`-prefixed path per line
    #[default]
    Text,
    /// JSON object with the file list (and stats when requested)
    Json,
}

/// Options that build a selection
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Read a selection list (exact paths, `dir/**`, `*.ext`, `dir/*`; `#` comments)
    #[arg(short = 'f', long = "from", value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Select every file at a tag level (can repeat: -t focus -t dev:feature)
    #[arg(short = 't', long = "tag", value_name = "SPEC")]
    pub tags: Vec<String>,
}

impl SelectionArgs {
    /// True when no selection source was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.tags.is_empty()
    }
}

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(name = "taglens")]
#[command(version, about = "Curate tagged codebase context: select, expand, and edit tags")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root of the codebase to scan
    #[arg(short = 'C', long = "root", global = true, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the export list for a selection
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Do not add files the selection depends on
        #[arg(long = "no-expand")]
        no_expand: bool,

        /// Maximum dependency hops from the selection (1-5, overrides config)
        #[arg(short = 'd', long = "depth", value_name = "N")]
        depth: Option<ExpansionDepth>,

        /// Show file counts and sizes for direct and implied files
        #[arg(short = 's', long = "stats")]
        stats: bool,

        /// Output format
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the list to a file instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show tag coverage for a selection (all files if none)
    Tags {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Add or delete tags across a selection
    #[command(visible_alias = "e")]
    Edit {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Tags to add, in annotation syntax (e.g. '#dev{feature[shield(render)]}')
        #[arg(short = 'a', long = "add", value_name = "TEXT")]
        add: Vec<String>,

        /// Tag level to delete, with everything beneath it (e.g. dev:feature)
        #[arg(short = 'D', long = "delete", value_name = "SPEC")]
        delete: Vec<String>,

        /// Preview changes without writing files
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// List files importing a package directory
    Importers {
        /// Package directory relative to the root (`.` for the root package)
        #[arg(value_name = "PACKAGE_DIR")]
        package: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Write a default project config (`.taglens.toml`) under the root
    Init {
        /// Overwrite an existing file
        #[arg(long = "force")]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
