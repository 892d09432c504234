// src/output/summary.rs
// =============================================================================
// The run summary: what was processed, what was skipped, and why.
//
// It is serialized to summary.json at the end of a completed run. The field
// names below are read by downstream tooling, so they must not change.
//
// {
//   "organization": "...",
//   "output": "/abs/path/downloads/extract3",
//   "repository_count": 42,
//   "generated_at": 1700000000,
//   "processed": [{ "repo", "readme_path", "original_file", "cleaned_file" }],
//   "skipped":   [{ "repo", "reason" }]
// }
// =============================================================================

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Why a repository produced no extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[serde(rename = "archived")]
    Archived,
    #[serde(rename = "no readme")]
    NoReadme,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archived => f.write_str("archived"),
            Self::NoReadme => f.write_str("no readme"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub repo: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    pub repo: String,
    /// README path inside the source repository
    pub readme_path: String,
    /// Paths below are relative to the output root
    pub original_file: String,
    pub cleaned_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub organization: String,
    pub output: String,
    pub repository_count: usize,
    /// Epoch seconds at which the run started
    pub generated_at: i64,
    pub processed: Vec<ProcessedEntry>,
    pub skipped: Vec<SkipRecord>,
}

impl RunSummary {
    pub fn new(organization: &str, output: &Path, generated_at: i64) -> Self {
        Self {
            organization: organization.to_string(),
            output: output.display().to_string(),
            repository_count: 0,
            generated_at,
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_processed(&mut self, entry: ProcessedEntry) {
        self.processed.push(entry);
    }

    pub fn record_skipped(&mut self, repo: &str, reason: SkipReason) {
        self.skipped.push(SkipRecord {
            repo: repo.to_string(),
            reason,
        });
    }

    // Renders the human-readable README.md index for the extract directory
    pub fn render_index(&self) -> String {
        let mut lines = vec![
            format!("# README extraction for `{}`", self.organization),
            String::new(),
            format!("- Total repos discovered: {}", self.repository_count),
            format!("- Processed: {}", self.processed.len()),
            format!("- Skipped: {}", self.skipped.len()),
            String::new(),
            "## Processed repositories".to_string(),
            String::new(),
        ];

        for entry in &self.processed {
            lines.push(format!("- `{}` → `{}`", entry.repo, entry.cleaned_file));
        }

        if !self.skipped.is_empty() {
            lines.extend([
                String::new(),
                "## Skipped repositories".to_string(),
                String::new(),
            ]);
            for record in &self.skipped {
                lines.push(format!("- `{}`: {}", record.repo, record.reason));
            }
        }

        let mut index = lines.join("\n").trim_end().to_string();
        index.push('\n');
        index
    }
}
