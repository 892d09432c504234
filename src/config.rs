// src/config.rs
// =============================================================================
// Resolves the crawl configuration once, before any request is made.
//
// Token precedence:
// 1. --token flag
// 2. GITHUB_TOKEN in the process environment (clap folds this into the flag)
// 3. GITHUB_TOKEN in <root>/.env
//
// The .env file is read into memory only; the process environment is never
// modified.
// =============================================================================

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::cli::CrawlArgs;

const TOKEN_VARIABLE: &str = "GITHUB_TOKEN";
const ENV_FILE: &str = ".env";

/// Everything a crawl needs, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub organization: String,
    /// Absolute workspace root containing ./downloads
    pub root: PathBuf,
    pub include_archived: bool,
    pub token: Option<String>,
    pub api_base: String,
}

impl CrawlConfig {
    pub fn resolve(args: CrawlArgs) -> Result<Self> {
        let root = if args.root.is_absolute() {
            args.root
        } else {
            env::current_dir()
                .context("Failed to determine the current directory")?
                .join(args.root)
        };

        let token = match args.token.filter(|t| !t.trim().is_empty()) {
            Some(token) => Some(token),
            None => read_env_file_value(&root.join(ENV_FILE), TOKEN_VARIABLE)?,
        };

        Ok(Self {
            organization: args.org,
            root,
            include_archived: args.include_archived,
            token,
            api_base: args.api_base,
        })
    }
}

// Looks up one key in a dotenv file; a missing file is not an error
fn read_env_file_value(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }

    debug!("Reading {}", path.display());
    let entries = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    for entry in entries {
        let (name, value) = entry.with_context(|| format!("Failed to parse {}", path.display()))?;
        if name == key && !value.trim().is_empty() {
            return Ok(Some(value));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::DEFAULT_API_BASE;
    use std::fs;

    fn args(root: PathBuf, token: Option<&str>) -> CrawlArgs {
        CrawlArgs {
            org: "acme".to_string(),
            root,
            include_archived: false,
            token: token.map(str::to_string),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    #[test]
    fn test_token_from_env_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(".env"),
            "# local secrets\nexport GITHUB_TOKEN=\"from-file\"\nOTHER=1\n",
        )
        .unwrap();

        let config = CrawlConfig::resolve(args(tmp.path().to_path_buf(), None)).unwrap();
        assert_eq!(config.token.as_deref(), Some("from-file"));
        assert_eq!(config.organization, "acme");
        assert_eq!(config.root, tmp.path());
    }

    #[test]
    fn test_flag_beats_env_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".env"), "GITHUB_TOKEN=from-file\n").unwrap();

        let config = CrawlConfig::resolve(args(tmp.path().to_path_buf(), Some("from-flag"))).unwrap();
        assert_eq!(config.token.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_blank_flag_falls_back_to_env_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".env"), "GITHUB_TOKEN=from-file\n").unwrap();

        let config = CrawlConfig::resolve(args(tmp.path().to_path_buf(), Some("  "))).unwrap();
        assert_eq!(config.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_no_token_anywhere() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CrawlConfig::resolve(args(tmp.path().to_path_buf(), None)).unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_relative_root_becomes_absolute() {
        let config = CrawlConfig::resolve(args(PathBuf::from("some/where"), Some("t"))).unwrap();
        assert!(config.root.is_absolute());
        assert!(config.root.ends_with("some/where"));
    }
}
