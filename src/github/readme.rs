// src/github/readme.rs
// =============================================================================
// The README retriever.
//
// GET /repos/{owner}/{repo}/readme returns JSON like:
//   { "path": "README.md", "encoding": "base64", "content": "IyBt\nb2Q=\n" }
//
// The content is base64 wrapped at 60 columns, so the line breaks are removed
// before decoding. A 404 means the repository simply has no README; that is
// returned as Ok(None), not as an error.
// =============================================================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use super::client::{Fetched, GitHubClient};
use super::error::GitHubError;
use super::repos::Repository;

const DEFAULT_README_PATH: &str = "README.md";

#[derive(Debug, Deserialize)]
struct ReadmePayload {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

/// A decoded README as served by GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReadme {
    /// Path of the README inside the repository, e.g. "docs/README.md"
    pub path: String,
    pub text: String,
}

impl GitHubClient {
    // Fetches and decodes the README of one repository
    //
    // Returns:
    //   Ok(Some(readme)) - the README exists
    //   Ok(None)         - the repository has no README
    //   Err(_)           - network, rate-limit or decoding failure
    pub async fn fetch_readme(
        &self,
        repository: &Repository,
    ) -> Result<Option<RawReadme>, GitHubError> {
        let (owner, name) =
            repository
                .owner_and_name()
                .ok_or_else(|| GitHubError::UnexpectedPayload {
                    url: repository.full_name.clone(),
                    detail: "repository full_name is not of the form owner/name".to_string(),
                })?;

        let url = self.endpoint(&["repos", owner, name, "readme"]);
        match self.get_json::<ReadmePayload>(url).await? {
            Fetched::Found(payload) => decode_readme(&repository.full_name, payload).map(Some),
            Fetched::NotFound => Ok(None),
        }
    }
}

fn decode_readme(repo: &str, payload: ReadmePayload) -> Result<RawReadme, GitHubError> {
    let encoding = payload.encoding.unwrap_or_default();
    if encoding != "base64" {
        return Err(GitHubError::UnsupportedEncoding {
            repo: repo.to_string(),
            encoding,
        });
    }

    let compact: String = payload.content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|source| GitHubError::InvalidContent {
            repo: repo.to_string(),
            source,
        })?;

    Ok(RawReadme {
        path: payload
            .path
            .unwrap_or_else(|| DEFAULT_README_PATH.to_string()),
        // Invalid UTF-8 is replaced rather than rejected
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
