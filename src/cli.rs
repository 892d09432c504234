// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - crawl: Download and clean every README of a GitHub organization
// - clean: Run the README cleaner on a local file (handy for checking rules)
//
// The token can come from --token, the GITHUB_TOKEN environment variable,
// or a .env file in the output root (see config.rs).
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::github::DEFAULT_API_BASE;

#[derive(Parser, Debug)]
#[command(
    name = "readme-harvest",
    version,
    about = "Crawl a GitHub organization and extract cleaned READMEs",
    long_about = "readme-harvest downloads the README of every public repository in a GitHub \
                  organization and strips badges, banners and footer sections, leaving the \
                  title, description and usage content as grounding context for a language model."
)]
pub struct Cli {
    /// Logging verbosity (RUST_LOG takes precedence when set)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl an organization and write a new downloads/extract<N> directory
    ///
    /// Example: readme-harvest crawl --org terraform-aws-modules --root .
    Crawl(CrawlArgs),

    /// Clean a local README and print the extract
    ///
    /// Example: readme-harvest clean README.md
    Clean {
        /// Markdown file to clean
        file: PathBuf,

        /// Write the extract here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// GitHub organization to crawl
    #[arg(long, default_value = "terraform-aws-modules")]
    pub org: String,

    /// Workspace root; extracts go to <root>/downloads/extract<N>
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Also process archived repositories
    #[arg(long)]
    pub include_archived: bool,

    /// GitHub token for higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API base URL (GitHub Enterprise: https://host/api/v3)
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
