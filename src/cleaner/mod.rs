// src/cleaner/mod.rs
// =============================================================================
// This module reduces README files to the parts worth feeding to a model.
//
// Submodules:
// - rules: The static footer-title set, the badge predicate, heading helpers
// - pipeline: The fixed multi-stage cleaning pipeline
//
// Cleaning is a pure function of the input text. It never touches the
// network or the file system, so the crawl and the `clean` subcommand share it.
// =============================================================================

mod pipeline;
mod rules;

pub use pipeline::clean_readme;
