// src/output/document.rs
// =============================================================================
// A README paired with its cleaned extract.
//
// Raw and cleaned text are kept side by side and both get written to disk,
// so every extract can be compared against the README it came from.
// =============================================================================

use crate::cleaner::clean_readme;
use crate::github::{RawReadme, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeDocument {
    /// Short repository name; also the name of its output directory
    pub repository: String,
    /// Where the README lives inside the repository
    pub source_path: String,
    pub raw: String,
    pub cleaned: String,
}

impl ReadmeDocument {
    pub fn new(repository: &Repository, readme: RawReadme) -> Self {
        let cleaned = clean_readme(&readme.text);
        Self {
            repository: repository.name.clone(),
            source_path: readme.path,
            raw: readme.text,
            cleaned,
        }
    }
}
