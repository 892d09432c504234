// src/crawl/mod.rs
// =============================================================================
// This module runs the organization crawl.
//
// Features:
// - Walks the repository listing lazily, page by page
// - Fetches, cleans and writes one README at a time
// - Records every repository as processed or skipped
// - Stops the whole run on the first fatal error (rate limit, network)
//
// Why sequential?
// - GitHub's rate limit is one shared counter per token
// - One request in flight keeps that counter's readings exact
// =============================================================================

mod orchestrator;

pub use orchestrator::{run_crawl, CrawlReport};
