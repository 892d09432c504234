// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Currently implements:
// - Listing an organization's public repositories, page by page
// - Fetching and decoding a repository's README
// - Stopping as soon as the rate limit is exhausted (with a wait hint)
//
// Calls are made one at a time. The rate-limit budget is a single shared
// counter on GitHub's side, and sequential calls keep its bookkeeping exact.
// =============================================================================

mod client;
mod error;
mod rate_limit;
mod readme;
mod repos;

pub use client::{GitHubClient, DEFAULT_API_BASE};
pub use error::GitHubError;
pub use readme::RawReadme;
pub use repos::{ListEntry, Repository};
