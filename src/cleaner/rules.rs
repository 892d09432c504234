// src/cleaner/rules.rs
// =============================================================================
// Static rules used by the README cleaner.
//
// Everything lexical lives here:
// - The set of footer headings that end the useful part of a README
// - The badge/banner predicate
// - Small helpers for recognising Markdown ATX headings
//
// Keeping these in one place means the pipeline never carries string
// literals of its own, and each rule can be tested on its own.
// =============================================================================

/// Heading titles (normalized) that start an administrative footer section.
pub const FOOTER_TITLES: &[&str] = &[
    "authors",
    "author",
    "license",
    "maintainers",
    "maintainer",
    "contributing",
    "contribution",
    "support",
    "changelog",
    "additional information",
    "security",
];

/// Normalized title of the heading that marks where usage content begins.
pub const USAGE_TITLE: &str = "usage";

/// Line prefixes that always indicate an image badge or banner.
const BADGE_PREFIXES: &[&str] = &["[![", "!["];

/// Hosts whose mere presence marks a line as a badge.
const BADGE_HOSTS: &[&str] = &["shields.io"];

/// How many lines after the title are searched for a description.
pub const DESCRIPTION_WINDOW: usize = 11;

// Returns true if the line renders a CI/status badge or a banner image
//
// A line is a badge/banner if, once trimmed, it:
//   - starts with "[![" or "![", or
//   - mentions shields.io anywhere, or
//   - contains the word "badge" together with an http(s) URL
//
// Blank lines are never badges.
pub fn is_badge_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    if BADGE_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
        return true;
    }

    if BADGE_HOSTS.iter().any(|host| trimmed.contains(host)) {
        return true;
    }

    trimmed.to_lowercase().contains("badge")
        && (trimmed.contains("http://") || trimmed.contains("https://"))
}

// Returns the ATX heading level (1-6) of a line, or None if it isn't a heading
//
// "## Usage" -> Some(2), "#hashtag" -> None, "####### seven" -> None
pub fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    // The marker must be followed by whitespace
    match trimmed[level..].chars().next() {
        Some(c) if c.is_whitespace() => Some(level),
        _ => None,
    }
}

// Normalizes a heading's text for comparison against the rule sets
//
// Strips the '#' marker, trims, lowercases and collapses inner whitespace:
//   "##   Additional   Information " -> "additional information"
pub fn normalize_heading_title(line: &str) -> String {
    line.trim()
        .trim_start_matches('#')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn is_footer_heading(line: &str) -> bool {
    matches!(heading_level(line), Some(2 | 3))
        && FOOTER_TITLES.contains(&normalize_heading_title(line).as_str())
}

pub fn is_usage_heading(line: &str) -> bool {
    heading_level(line) == Some(2) && normalize_heading_title(line) == USAGE_TITLE
}
