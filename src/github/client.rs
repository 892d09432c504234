// src/github/client.rs
// =============================================================================
// A small GitHub REST client built directly on reqwest.
//
// Every request:
// - carries the GitHub JSON media type and a fixed User-Agent
// - carries "Authorization: Bearer <token>" when a token is configured
// - is followed by a rate-limit check on the response headers
//
// Endpoints are built from a configurable base URL so the same client works
// against GitHub Enterprise or a local mock server in tests.
// =============================================================================

use std::time::Duration;

use chrono::Utc;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::GitHubError;
use super::rate_limit::RateLimitState;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("readme-harvest/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Outcome of a GET that may legitimately hit a 404
#[derive(Debug)]
pub(crate) enum Fetched<T> {
    Found(T),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    authenticated: bool,
}

impl GitHubClient {
    // Creates a client for `api_base`, optionally authenticated with `token`
    //
    // The token only raises the rate-limit ceiling; requests look the same
    // with or without it.
    pub fn new(token: Option<&str>, api_base: &str) -> Result<Self, GitHubError> {
        let base = Url::parse(api_base)
            .map_err(|e| GitHubError::InvalidBaseUrl(format!("{api_base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl(api_base.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GitHubError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| GitHubError::Transport {
                url: api_base.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            api_base: base,
            authenticated: token.is_some(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    // Appends path segments to the base URL, percent-encoding each one
    //
    // endpoint(&["orgs", "rust-lang", "repos"]) -> https://api.github.com/orgs/rust-lang/repos
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // Checked in new(): the base URL can always take path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // Issues one GET and classifies the response
    //
    // Order matters: the rate-limit headers are inspected before the status
    // code, so a 403 that carries "remaining: 0" is reported as a rate limit.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Fetched<T>, GitHubError> {
        debug!("GET {url}");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| GitHubError::Transport {
                url: url.to_string(),
                source,
            })?;

        if let Some(state) = RateLimitState::from_headers(response.headers()) {
            debug!(
                "Rate limit: {} call(s) left, window resets at {}",
                state.remaining, state.reset_at
            );
            state.check(Utc::now().timestamp(), self.authenticated)?;
        }

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::NotFound);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(GitHubError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| GitHubError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(GitHubError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let parsed = serde_json::from_str(&body).map_err(|e| GitHubError::UnexpectedPayload {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

        Ok(Fetched::Found(parsed))
    }
}
