// src/github/repos.rs
// =============================================================================
// The repository lister.
//
// GET /orgs/{org}/repos?per_page=100&page=N&type=public
//
// Pages are requested one after another until a page comes back empty; that
// is the only stop condition (no Link header or total count is consulted).
// The listing is exposed as a lazy Stream so the crawl can start working on
// the first repositories before later pages are requested.
// =============================================================================

use futures::stream::{self, Stream, TryStreamExt};
use log::debug;
use serde::Deserialize;

use super::client::{Fetched, GitHubClient};
use super::error::GitHubError;

pub const PAGE_SIZE: u32 = 100;

/// One repository from the organization listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    /// Short name, e.g. "terraform-aws-vpc"
    pub name: String,
    /// Organization-qualified name, e.g. "terraform-aws-modules/terraform-aws-vpc"
    pub full_name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl Repository {
    // "acme/widgets" -> Some(("acme", "widgets"))
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        self.full_name
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
    }
}

/// What the lister yields for each repository it sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// Should be fetched and cleaned
    Candidate(Repository),
    /// Archived, and the run excludes archived repositories
    Archived(Repository),
}

impl ListEntry {
    fn classify(repository: Repository, include_archived: bool) -> Self {
        if repository.archived && !include_archived {
            Self::Archived(repository)
        } else {
            Self::Candidate(repository)
        }
    }

    pub fn repository(&self) -> &Repository {
        match self {
            Self::Candidate(repository) | Self::Archived(repository) => repository,
        }
    }
}

impl GitHubClient {
    // Fetches a single page of the listing (pages start at 1)
    //
    // Exposed on its own so a listing can be restarted from any page.
    pub async fn fetch_repository_page(
        &self,
        org: &str,
        page: u32,
    ) -> Result<Vec<Repository>, GitHubError> {
        let mut url = self.endpoint(&["orgs", org, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("type", "public");

        match self.get_json::<Vec<Repository>>(url).await? {
            Fetched::Found(repositories) => {
                debug!("Page {page} of {org}: {} repositories", repositories.len());
                Ok(repositories)
            }
            Fetched::NotFound => Err(GitHubError::OrganizationNotFound(org.to_string())),
        }
    }

    // Lists every public repository of `org`, page by page, in source order
    //
    // Archived repositories are yielded as ListEntry::Archived unless
    // `include_archived` is set, so the caller can account for them without
    // ever fetching them.
    pub fn list_org_repositories<'a>(
        &'a self,
        org: &'a str,
        include_archived: bool,
    ) -> impl Stream<Item = Result<ListEntry, GitHubError>> + 'a {
        stream::try_unfold(1u32, move |page| async move {
            let repositories = self.fetch_repository_page(org, page).await?;
            if repositories.is_empty() {
                return Ok(None);
            }
            Ok::<_, GitHubError>(Some((repositories, page + 1)))
        })
        .map_ok(move |repositories| {
            stream::iter(
                repositories
                    .into_iter()
                    .map(move |repository| {
                        Ok::<_, GitHubError>(ListEntry::classify(repository, include_archived))
                    }),
            )
        })
        .try_flatten()
    }
}
