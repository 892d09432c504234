// src/output/mod.rs
// =============================================================================
// This module persists a crawl run to disk.
//
// Submodules:
// - document: A README paired with its cleaned extract
// - summary: The processed/skipped ledger serialized to summary.json
// - writer: Allocates the extract directory and writes every file
// =============================================================================

mod document;
mod summary;
mod writer;

pub use document::ReadmeDocument;
pub use summary::{RunSummary, SkipReason};
pub use writer::RunWriter;
