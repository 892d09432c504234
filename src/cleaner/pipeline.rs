// src/cleaner/pipeline.rs
// =============================================================================
// This module turns a raw README into a dense extract for LLM grounding.
//
// Pipeline (fixed order):
// 1. Find the title (first level-1 heading) and the description under it
// 2. Find where the useful content starts
// 3. Find where it ends (first footer heading like "## License")
// 4. Drop badge/banner lines from the body
// 5. Reassemble title + description + body and squeeze blank lines
//
// Everything is line based: no Markdown parser, no I/O.
// =============================================================================

use super::rules::{
    heading_level, is_badge_line, is_footer_heading, is_usage_heading, DESCRIPTION_WINDOW,
};

// Which rule selected the content start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartRule {
    /// Line after a "## Usage" heading
    AfterUsage,
    /// First "### " heading
    FirstSubsection,
    /// Line after the title
    AfterTitle,
    /// No title at all: the whole document
    DocumentStart,
}

#[derive(Debug, Clone, Copy)]
struct ContentStart {
    line: usize,
    rule: StartRule,
}

// Cleans a raw README
//
// Returns the cleaned Markdown without a trailing newline. The output never
// contains badge lines, never has two blank lines in a row, and never starts
// or ends with a blank line.
//
// Example:
//   "# mod\n\nA module.\n\n## Usage\n\nfoo\n\n## Authors\nbar"
//   -> "# mod\n\nA module.\n\nfoo"
pub fn clean_readme(markdown: &str) -> String {
    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let title = find_title(&lines);
    let description = title.and_then(|t| find_description(&lines, t));

    let start = find_content_start(&lines, title);
    // A footer above the Usage heading ends the content before it starts
    let scan_from = match start.rule {
        StartRule::AfterUsage => title.map_or(0, |t| t + 1),
        _ => start.line,
    };
    let end = find_content_end(&lines, scan_from);

    let mut assembled: Vec<&str> = Vec::new();
    if let Some(t) = title {
        assembled.push(lines[t].trim_end());
        assembled.push("");
        if let Some(d) = description {
            assembled.push(lines[d].trim_end());
            assembled.push("");
        }
    }

    if start.line < end {
        for (index, line) in lines.iter().enumerate().take(end).skip(start.line) {
            // The title and description are already in place
            if Some(index) == title || Some(index) == description {
                continue;
            }
            if is_badge_line(line) {
                continue;
            }
            if start.rule == StartRule::AfterUsage && is_usage_heading(line) {
                continue;
            }
            assembled.push(line.trim_end());
        }
    }

    compact_blank_lines(&assembled).join("\n")
}

// First level-1 heading that isn't itself a badge line
fn find_title(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|line| heading_level(line) == Some(1) && !is_badge_line(line))
}

// First non-empty, non-heading, non-badge line shortly after the title
fn find_description(lines: &[&str], title: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(title + 1)
        .take(DESCRIPTION_WINDOW)
        .find(|(_, line)| {
            !line.trim().is_empty() && heading_level(line).is_none() && !is_badge_line(line)
        })
        .map(|(index, _)| index)
}

fn find_content_start(lines: &[&str], title: Option<usize>) -> ContentStart {
    if let Some(usage) = lines.iter().position(|line| is_usage_heading(line)) {
        return ContentStart {
            line: usage + 1,
            rule: StartRule::AfterUsage,
        };
    }

    if let Some(subsection) = lines.iter().position(|line| heading_level(line) == Some(3)) {
        return ContentStart {
            line: subsection,
            rule: StartRule::FirstSubsection,
        };
    }

    match title {
        Some(t) => ContentStart {
            line: t + 1,
            rule: StartRule::AfterTitle,
        },
        None => ContentStart {
            line: 0,
            rule: StartRule::DocumentStart,
        },
    }
}

// Index of the first footer heading at or after `from`, or the document length
fn find_content_end(lines: &[&str], from: usize) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| is_footer_heading(line))
        .map_or(lines.len(), |(index, _)| index)
}

// Collapses blank runs to a single blank line and trims blank lines at both ends
fn compact_blank_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut compacted: Vec<&str> = Vec::with_capacity(lines.len());
    for &line in lines {
        if line.trim().is_empty() {
            if compacted.last().is_some_and(|last| !last.is_empty()) {
                compacted.push("");
            }
        } else {
            compacted.push(line);
        }
    }

    while compacted.last() == Some(&"") {
        compacted.pop();
    }

    compacted
}
