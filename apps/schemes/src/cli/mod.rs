//! # Schemes CLI Module
//!
//! ## Available Commands
//!
//! - `check` - Load a scheme and report its shape
//! - `tree` - Print the tree below every root
//! - `find` - Search components by name, pattern or substring
//! - `sort` - Half-sort a scheme and save it
//! - `dot` - Export a scheme as a Graphviz digraph
//! - `copy` - Deep-copy a scheme, verify the copy and save it

mod commands;

use crate::config::AppConfig;
use clap::{Args, Parser, Subcommand};
use schemes_core::{SchemeError, SearchOrder};
use std::io::Write;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Schemes - directed acyclic multigraphs of named components
#[derive(Parser, Debug)]
#[command(name = "schemes")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a scheme and report members, roots and leaves
    Check {
        /// Scheme document
        file: PathBuf,
    },

    /// Print the tree below every root
    Tree {
        /// Scheme document
        file: PathBuf,
    },

    /// Search components by name
    Find {
        /// Scheme document
        file: PathBuf,

        #[command(flatten)]
        matcher: MatchArgs,

        /// Search breadth-first from the roots
        #[arg(long)]
        from_roots: bool,

        /// Ignore case for --contains
        #[arg(short, long)]
        ignore_case: bool,
    },

    /// Half-sort a scheme so that parents precede children, then save it
    Sort {
        /// Scheme document
        file: PathBuf,

        /// Output path (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a scheme as a Graphviz digraph
    Dot {
        /// Scheme document
        file: PathBuf,

        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Deep-copy a scheme, verify the copy and save it
    Copy {
        /// Scheme document
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Exactly one way to match names.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MatchArgs {
    /// Exact name
    #[arg(long)]
    pub name: Option<String>,

    /// Whole-name regular expression
    #[arg(long)]
    pub regex: Option<String>,

    /// Substring of the name
    #[arg(long)]
    pub contains: Option<String>,
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Configuration merged with command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub json_mode: bool,
    pub order: SearchOrder,
    pub case_sensitive: bool,
    pub sort_before_save: bool,
}

impl Settings {
    /// Flags override file values.
    pub fn merge(config: &AppConfig, json_mode: bool) -> Self {
        Self {
            json_mode: json_mode || config.output.json,
            order: if config.search.from_roots {
                SearchOrder::FromRoots
            } else {
                SearchOrder::Fifo
            },
            case_sensitive: config.search.case_sensitive,
            sort_before_save: config.output.sort_before_save,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute a parsed command, writing results to `out`.
pub fn execute(command: Commands, settings: Settings, out: &mut dyn Write) -> Result<(), SchemeError> {
    match command {
        Commands::Check { file } => cmd_check(&file, settings, out),
        Commands::Tree { file } => cmd_tree(&file, settings, out),
        Commands::Find {
            file,
            matcher,
            from_roots,
            ignore_case,
        } => {
            let mut settings = settings;
            if from_roots {
                settings.order = SearchOrder::FromRoots;
            }
            if ignore_case {
                settings.case_sensitive = false;
            }
            cmd_find(&file, &matcher, settings, out)
        }
        Commands::Sort { file, output } => {
            let target = output.unwrap_or_else(|| file.clone());
            cmd_sort(&file, &target, settings, out)
        }
        Commands::Dot { file, output } => cmd_dot(&file, output.as_deref(), settings, out),
        Commands::Copy { file, output } => cmd_copy(&file, &output, settings, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn find_requires_one_matcher() {
        assert!(Cli::try_parse_from(["schemes", "find", "a.xml"]).is_err());
        assert!(
            Cli::try_parse_from(["schemes", "find", "a.xml", "--name", "x", "--regex", "y"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["schemes", "find", "a.xml", "--contains", "x"])
            .expect("parse");
        assert!(matches!(cli.command, Commands::Find { .. }));
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        config.search.from_roots = true;
        let settings = Settings::merge(&config, true);

        assert!(settings.json_mode);
        assert_eq!(settings.order, SearchOrder::FromRoots);
        assert!(settings.case_sensitive);
    }
}
