//! CLI commands and argument parsing

use crate::routing::RouteKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Static-site page planner for headless WordPress
#[derive(Parser, Debug)]
#[command(name = "pressplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Site definition file (YAML)
    #[arg(short, long, global = true)]
    pub site: Option<PathBuf>,

    /// Output format for reports
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch content and emit one JSON line per page
    Build {
        /// Read content from a snapshot file instead of the endpoint
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum records emitted concurrently
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Validate the site definition
    Validate,

    /// Print every GraphQL document a build issues
    Queries,

    /// Preview the archive paths of a collection
    Routes {
        /// Number of items in the collection
        #[arg(long)]
        items: usize,

        /// Items per page
        #[arg(long, allow_negative_numbers = true)]
        page_size: i64,

        /// Route kind: root, ns:NAME or term:URI
        #[arg(long, default_value = "root")]
        kind: RouteKind,

        /// Insert a slash between a term URI and the page number
        #[arg(long)]
        ensure_slash: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "pressplan",
            "build",
            "-s",
            "site.yaml",
            "--snapshot",
            "dump.json",
            "-o",
            "pages.jsonl",
            "--concurrency",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.site, Some(PathBuf::from("site.yaml")));
        match cli.command {
            Commands::Build {
                snapshot,
                output,
                concurrency,
            } => {
                assert_eq!(snapshot, Some(PathBuf::from("dump.json")));
                assert_eq!(output, Some(PathBuf::from("pages.jsonl")));
                assert_eq!(concurrency, Some(4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_routes_kind() {
        let cli = Cli::try_parse_from([
            "pressplan",
            "routes",
            "--items",
            "23",
            "--page-size",
            "10",
            "--kind",
            "term:/category/news",
            "--ensure-slash",
        ])
        .unwrap();

        match cli.command {
            Commands::Routes {
                items,
                page_size,
                kind,
                ensure_slash,
            } => {
                assert_eq!(items, 23);
                assert_eq!(page_size, 10);
                assert_eq!(kind, RouteKind::term("/category/news"));
                assert!(ensure_slash);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_routes_rejects_bad_kind() {
        let result = Cli::try_parse_from([
            "pressplan", "routes", "--items", "1", "--page-size", "1", "--kind", "blog",
        ]);
        assert!(result.is_err());
    }
}
