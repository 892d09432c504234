// src/crawl/orchestrator.rs
// =============================================================================
// Drives one crawl: list -> fetch README -> clean -> write, one repository at
// a time.
//
// Every repository the lister returns ends up exactly once in either
// `processed` or `skipped`:
// - archived (and not requested)  -> skipped, reason "archived", never fetched
// - no README                     -> skipped, reason "no readme"
// - otherwise                     -> processed
//
// Any other failure (rate limit, network, bad payload) aborts the run. Files
// already written stay on disk, but summary.json is only written at the very
// end, so an aborted extract is easy to spot.
// =============================================================================

use std::path::PathBuf;
use std::pin::pin;

use anyhow::Result;
use chrono::Utc;
use futures::TryStreamExt;
use log::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::github::{GitHubClient, ListEntry};
use crate::output::{ReadmeDocument, RunSummary, RunWriter, SkipReason};

/// What a completed crawl produced.
#[derive(Debug)]
pub struct CrawlReport {
    pub output_dir: PathBuf,
    pub summary: RunSummary,
}

pub async fn run_crawl(client: &GitHubClient, config: &CrawlConfig) -> Result<CrawlReport> {
    let generated_at = Utc::now().timestamp();
    let mut entries = pin!(client.list_org_repositories(&config.organization, config.include_archived));

    // Pull the first page before touching the disk: an unknown organization
    // or a rejected token fails here, without leaving an empty extract behind.
    let mut next = entries.try_next().await?;

    let writer = RunWriter::create(&config.root)?;
    info!("Writing extract to {}", writer.output_dir().display());
    let mut summary = RunSummary::new(&config.organization, writer.output_dir(), generated_at);

    while let Some(entry) = next {
        summary.repository_count += 1;
        debug!("Listed {}", entry.repository().full_name);

        match entry {
            ListEntry::Archived(repository) => {
                debug!("Skipping {} (archived)", repository.full_name);
                summary.record_skipped(&repository.name, SkipReason::Archived);
            }
            ListEntry::Candidate(repository) => {
                writer.check_repository_name(&repository.name)?;
                debug!(
                    "Fetching README of {} (branch {})",
                    repository.full_name,
                    repository.default_branch.as_deref().unwrap_or("unknown")
                );
                match client.fetch_readme(&repository).await? {
                    Some(readme) => {
                        let document = ReadmeDocument::new(&repository, readme);
                        let processed = writer.write_document(&document)?;
                        info!("Extracted {}", repository.full_name);
                        summary.record_processed(processed);
                    }
                    None => {
                        warn!("{} has no README", repository.full_name);
                        summary.record_skipped(&repository.name, SkipReason::NoReadme);
                    }
                }
            }
        }

        next = entries.try_next().await?;
    }

    let output_dir = writer.finish(&summary)?;
    Ok(CrawlReport {
        output_dir,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{GitHubError, DEFAULT_API_BASE};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(root: &Path, include_archived: bool) -> CrawlConfig {
        CrawlConfig {
            organization: "acme".to_string(),
            root: root.to_path_buf(),
            include_archived,
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    fn repo_json(name: &str, archived: bool) -> serde_json::Value {
        json!({ "name": name, "full_name": format!("acme/{name}"), "archived": archived })
    }

    async fn mount_listing(server: &MockServer, pages: Vec<serde_json::Value>) {
        for (index, body) in pages.into_iter().enumerate() {
            Mock::given(method("GET"))
                .and(path("/orgs/acme/repos"))
                .and(query_param("page", (index + 1).to_string().as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(server)
                .await;
        }
    }

    async fn mount_readme(server: &MockServer, name: &str, markdown: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/{name}/readme")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "path": "README.md",
                "encoding": "base64",
                "content": STANDARD.encode(markdown),
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_missing_readme(server: &MockServer, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/{name}/readme")))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn forbid_readme(server: &MockServer, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/{name}/readme")))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_full_crawl_partitions_repositories() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            vec![
                json!([repo_json("vpc", false), repo_json("legacy", true)]),
                json!([repo_json("empty", false), repo_json("iam", false)]),
                json!([]),
            ],
        )
        .await;
        mount_readme(
            &server,
            "vpc",
            "# vpc\n\n[![CI](https://x/badge.svg)](https://y)\n\nCreates a VPC.\n\n## Usage\n\nmodule \"vpc\" {}\n\n## License\nApache",
        )
        .await;
        mount_readme(&server, "iam", "# iam\nIAM things.\n").await;
        mount_missing_readme(&server, "empty").await;
        forbid_readme(&server, "legacy").await;

        let tmp = tempfile::tempdir().unwrap();
        let client = GitHubClient::new(None, &server.uri()).unwrap();
        let report = run_crawl(&client, &config(tmp.path(), false)).await.unwrap();
        let summary = &report.summary;

        assert_eq!(report.output_dir, tmp.path().join("downloads/extract1"));
        assert_eq!(summary.repository_count, 4);

        let processed: Vec<&str> = summary.processed.iter().map(|p| p.repo.as_str()).collect();
        assert_eq!(processed, vec!["vpc", "iam"]);
        let skipped: Vec<(&str, SkipReason)> = summary
            .skipped
            .iter()
            .map(|s| (s.repo.as_str(), s.reason))
            .collect();
        assert_eq!(
            skipped,
            vec![("legacy", SkipReason::Archived), ("empty", SkipReason::NoReadme)]
        );

        // processed + skipped is exactly the listing, with no duplicates
        let all: BTreeSet<&str> = processed.iter().chain(skipped.iter().map(|(r, _)| r)).copied().collect();
        assert_eq!(all.len(), summary.repository_count);
        assert_eq!(all, BTreeSet::from(["vpc", "legacy", "empty", "iam"]));

        let cleaned = fs::read_to_string(report.output_dir.join("vpc/README.cleaned.md")).unwrap();
        assert_eq!(cleaned, "# vpc\n\nCreates a VPC.\n\nmodule \"vpc\" {}\n");
        let original = fs::read_to_string(report.output_dir.join("vpc/README.original.md")).unwrap();
        assert!(original.contains("## License"));

        let on_disk: RunSummary =
            serde_json::from_str(&fs::read_to_string(report.output_dir.join("summary.json")).unwrap()).unwrap();
        assert_eq!(&on_disk, summary);
        assert!(report.output_dir.join("README.md").is_file());
    }

    #[tokio::test]
    async fn test_include_archived_fetches_them() {
        let server = MockServer::start().await;
        mount_listing(&server, vec![json!([repo_json("legacy", true)]), json!([])]).await;
        mount_readme(&server, "legacy", "# legacy\nOld.\n").await;

        let tmp = tempfile::tempdir().unwrap();
        let client = GitHubClient::new(None, &server.uri()).unwrap();
        let report = run_crawl(&client, &config(tmp.path(), true)).await.unwrap();

        assert_eq!(report.summary.processed.len(), 1);
        assert!(report.summary.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_aborts_without_summary() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            vec![json!([repo_json("first", false), repo_json("second", false)])],
        )
        .await;

        let reset = Utc::now().timestamp() + 120;
        Mock::given(method("GET"))
            .and(path("/repos/acme/first/readme"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", reset.to_string().as_str())
                    .set_body_json(json!({ "encoding": "base64", "content": "" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        forbid_readme(&server, "second").await;
        // The listing must not be continued either
        Mock::given(method("GET"))
            .and(path("/orgs/acme/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = GitHubClient::new(None, &server.uri()).unwrap();
        let err = run_crawl(&client, &config(tmp.path(), false)).await.unwrap_err();

        let github = err.downcast_ref::<GitHubError>().expect("GitHub error");
        let wait = github.retry_after().expect("rate limit error");
        assert!((119..=120).contains(&wait), "unexpected wait {wait}");

        let extract = tmp.path().join("downloads/extract1");
        assert!(extract.is_dir());
        assert!(!extract.join("summary.json").exists());
    }

    #[tokio::test]
    async fn test_reserved_repository_name_stops_before_fetching() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            vec![json!([repo_json("summary.json", false)]), json!([])],
        )
        .await;
        forbid_readme(&server, "summary.json").await;

        let tmp = tempfile::tempdir().unwrap();
        let client = GitHubClient::new(None, &server.uri()).unwrap();
        let err = run_crawl(&client, &config(tmp.path(), false)).await.unwrap_err();

        assert!(err.to_string().contains("Repository `summary.json` cannot be extracted"));
        assert!(!tmp.path().join("downloads/extract1/summary.json").exists());
    }

    #[tokio::test]
    async fn test_unknown_organization_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let client = GitHubClient::new(None, &server.uri()).unwrap();
        let err = run_crawl(&client, &config(tmp.path(), false)).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GitHubError>(),
            Some(GitHubError::OrganizationNotFound(_))
        ));
        assert!(!tmp.path().join("downloads").exists());
    }

    #[tokio::test]
    async fn test_empty_organization_still_completes() {
        let server = MockServer::start().await;
        mount_listing(&server, vec![json!([])]).await;

        let tmp = tempfile::tempdir().unwrap();
        let client = GitHubClient::new(None, &server.uri()).unwrap();
        let report = run_crawl(&client, &config(tmp.path(), false)).await.unwrap();

        assert_eq!(report.summary.repository_count, 0);
        assert!(report.output_dir.join("summary.json").is_file());
    }
}
