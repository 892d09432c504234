// src/output/writer.rs
// =============================================================================
// The run writer: owns one numbered extract directory for the whole run.
//
// Layout:
//   <root>/downloads/extract<N>/
//       README.md                 human-readable index   (written last)
//       summary.json              machine-readable summary (written last)
//       <repo>/README.original.md
//       <repo>/README.cleaned.md
//
// N is the smallest number whose directory does not exist yet, so every run
// lands in a fresh directory and earlier extracts are never touched. Files
// are only ever created, never rewritten. A run that aborts leaves its
// repository files behind but no summary.json.
// =============================================================================

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;

use super::document::ReadmeDocument;
use super::summary::{ProcessedEntry, RunSummary};

pub const DOWNLOADS_DIR: &str = "downloads";
const EXTRACT_PREFIX: &str = "extract";
const ORIGINAL_FILE: &str = "README.original.md";
const CLEANED_FILE: &str = "README.cleaned.md";
const SUMMARY_FILE: &str = "summary.json";
const INDEX_FILE: &str = "README.md";

// Run-level files; a repository directory may not take their names
const RESERVED_NAMES: &[&str] = &[SUMMARY_FILE, INDEX_FILE];

#[derive(Debug)]
pub struct RunWriter {
    root: PathBuf,
    output_dir: PathBuf,
}

impl RunWriter {
    // Claims the next free <root>/downloads/extract<N> directory
    //
    // The directory is claimed with a non-recursive create, so if another
    // process grabs the same number first we simply move on to the next one.
    pub fn create(root: &Path) -> Result<Self> {
        let downloads = root.join(DOWNLOADS_DIR);
        fs::create_dir_all(&downloads)
            .with_context(|| format!("Failed to create {}", downloads.display()))?;

        let mut number: u32 = 1;
        loop {
            let candidate = downloads.join(format!("{EXTRACT_PREFIX}{number}"));
            match fs::create_dir(&candidate) {
                Ok(()) => {
                    debug!("Claimed output directory {}", candidate.display());
                    return Ok(Self {
                        root: root.to_path_buf(),
                        output_dir: candidate,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => number += 1,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to create {}", candidate.display()))
                }
            }
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    // Fails if a repository directory named `repo` would collide with the
    // run's own summary or index file
    //
    // Compared case-insensitively, since the extract may live on a
    // case-insensitive file system.
    pub fn check_repository_name(&self, repo: &str) -> Result<()> {
        if let Some(reserved) = RESERVED_NAMES
            .iter()
            .find(|reserved| reserved.eq_ignore_ascii_case(repo))
        {
            bail!(
                "Repository `{repo}` cannot be extracted: its directory would collide with the run's {reserved} in {}",
                self.output_dir.display()
            );
        }
        Ok(())
    }

    // Writes the raw and cleaned README of one repository
    //
    // Returns the summary entry, with file paths relative to the root.
    pub fn write_document(&self, document: &ReadmeDocument) -> Result<ProcessedEntry> {
        self.check_repository_name(&document.repository)?;
        let repo_dir = self.output_dir.join(&document.repository);
        fs::create_dir(&repo_dir)
            .with_context(|| format!("Failed to create {}", repo_dir.display()))?;

        let original = repo_dir.join(ORIGINAL_FILE);
        let cleaned = repo_dir.join(CLEANED_FILE);
        write_new(&original, &document.raw)?;
        write_new(&cleaned, &with_final_newline(&document.cleaned))?;

        Ok(ProcessedEntry {
            repo: document.repository.clone(),
            readme_path: document.source_path.clone(),
            original_file: self.relative(&original),
            cleaned_file: self.relative(&cleaned),
        })
    }

    // Writes summary.json and the README.md index, completing the run
    pub fn finish(self, summary: &RunSummary) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
        write_new(&self.output_dir.join(SUMMARY_FILE), &with_final_newline(&json))?;
        write_new(&self.output_dir.join(INDEX_FILE), &summary.render_index())?;
        Ok(self.output_dir)
    }

    // "<root>/downloads/extract1/x/README.md" -> "downloads/extract1/x/README.md"
    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn with_final_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

// Creates a new file; fails instead of overwriting an existing one
fn write_new(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
