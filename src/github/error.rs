// src/github/error.rs
// =============================================================================
// Errors returned by the GitHub client.
//
// The crawl needs to tell these apart:
// - RateLimitExceeded: fatal, but resumable after `wait_seconds`
// - OrganizationNotFound / Unauthorized: configuration problems
// - Everything else: transport or protocol failures
//
// A missing README is NOT an error; the retriever returns None for it.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API rate limit reached; resume in {wait_seconds}s{}", token_hint(.authenticated))]
    RateLimitExceeded {
        wait_seconds: u64,
        authenticated: bool,
    },

    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("GitHub rejected the request credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("HTTP {status} for {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Network error for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {url}: {detail}")]
    UnexpectedPayload { url: String, detail: String },

    #[error("Unsupported README encoding for {repo}: {encoding}")]
    UnsupportedEncoding { repo: String, encoding: String },

    #[error("Invalid README content for {repo}")]
    InvalidContent {
        repo: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("GitHub token contains characters that cannot be sent in a header")]
    InvalidToken,
}

impl GitHubError {
    /// Seconds to wait before a rate-limited run can be resumed.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimitExceeded { wait_seconds, .. } => Some(*wait_seconds),
            _ => None,
        }
    }
}

fn token_hint(authenticated: &bool) -> &'static str {
    if *authenticated {
        ""
    } else {
        " (set GITHUB_TOKEN for higher limits)"
    }
}
