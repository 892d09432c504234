// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = rate limited, 2 = error)
//
// The crawl runs on tokio's single-threaded runtime: requests are awaited one
// by one, never in parallel.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cleaner;       // src/cleaner/ - README cleaning pipeline
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl configuration
mod crawl;         // src/crawl/ - the crawl orchestrator
mod github;        // src/github/ - GitHub REST client
mod output;        // src/output/ - extract directory and summary files

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands, CrawlArgs, LogLevel};
use config::CrawlConfig;
use github::{GitHubClient, GitHubError};

const EXIT_OK: i32 = 0;
const EXIT_RATE_LIMITED: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Crawl(args) => handle_crawl(args).await,
        Commands::Clean { file, output } => handle_clean(&file, output.as_deref()),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let config = CrawlConfig::resolve(args)?;

    let client = GitHubClient::new(config.token.as_deref(), &config.api_base)?;
    if client.is_authenticated() {
        println!("🔑 Using GITHUB_TOKEN for authenticated API requests.");
    }
    println!("🔍 Crawling organization: {}", config.organization);

    let report = crawl::run_crawl(&client, &config).await?;

    let summary = &report.summary;
    println!();
    println!("📊 Summary:");
    println!("   📋 Repositories: {}", summary.repository_count);
    println!("   ✅ Processed: {}", summary.processed.len());
    println!("   ⏭️  Skipped: {}", summary.skipped.len());
    println!("📁 Done. Output directory: {}", report.output_dir.display());

    Ok(EXIT_OK)
}

// Handles the 'clean' subcommand
fn handle_clean(file: &Path, output: Option<&Path>) -> Result<i32> {
    let markdown =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let mut cleaned = cleaner::clean_readme(&markdown);
    if !cleaned.is_empty() {
        cleaned.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, cleaned)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => print!("{cleaned}"),
    }

    Ok(EXIT_OK)
}

// A rate limit is resumable, so it gets its own exit code
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<GitHubError>().and_then(GitHubError::retry_after) {
        Some(_) => EXIT_RATE_LIMITED,
        None => EXIT_ERROR,
    }
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    logger_builder(env_logger::Env::default().filter_or("RUST_LOG", level), log_level).init();
}

// RUST_LOG, when set, overrides the level picked on the command line
fn logger_builder(env: env_logger::Env<'_>, log_level: LogLevel) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env);
    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace));
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let limited = anyhow::Error::new(GitHubError::RateLimitExceeded {
            wait_seconds: 30,
            authenticated: false,
        });
        assert_eq!(exit_code_for(&limited), EXIT_RATE_LIMITED);

        let missing = anyhow::Error::new(GitHubError::OrganizationNotFound("x".to_string()))
            .context("while crawling");
        assert_eq!(exit_code_for(&missing), EXIT_ERROR);

        assert_eq!(exit_code_for(&anyhow::anyhow!("disk full")), EXIT_ERROR);
    }

    #[test]
    fn test_log_level_off_still_honors_rust_log() {
        let env = env_logger::Env::new().filter_or("READMEH_TEST_LOG_UNSET", "off");
        let logger = logger_builder(env, LogLevel::Off).build();
        assert_eq!(logger.filter(), log::LevelFilter::Off);

        std::env::set_var("READMEH_TEST_LOG_SET", "debug");
        let env = env_logger::Env::new().filter_or("READMEH_TEST_LOG_SET", "off");
        let logger = logger_builder(env, LogLevel::Off).build();
        assert_eq!(logger.filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_clean_file_to_output() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("README.md");
        let output = tmp.path().join("README.cleaned.md");
        fs::write(&input, "# mod\n\nA module.\n\n## Usage\n\nfoo\n\n## Authors\nbar").unwrap();

        assert_eq!(handle_clean(&input, Some(&output)).unwrap(), EXIT_OK);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# mod\n\nA module.\n\nfoo\n");
    }

    #[test]
    fn test_clean_missing_file() {
        let err = handle_clean(Path::new("/definitely/not/here.md"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
