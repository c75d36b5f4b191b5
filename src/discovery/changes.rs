use super::paths::{normalize, SourceFilter};
use crate::error::ChangeSetError;
use crate::github::{ChangedFile, Event, GitHubApi, RepoId};
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, warn};

/// Highest page requested from the diff APIs
pub const MAX_PAGE: u32 = 10;

pub const PAGE_SIZE: u32 = 30;

/// Outcome of change set resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSet {
    Files {
        files: Vec<String>,
        /// Pagination stopped before the API ran out of entries
        truncated: bool,
    },
    /// The event carries no diff; analyze the whole source path
    Unsupported,
}

/// One page of changed files
#[derive(Debug, Default)]
pub struct Page {
    pub entries: Vec<ChangedFile>,
    pub has_more: bool,
}

impl Page {
    pub fn from_entries(entries: Vec<ChangedFile>) -> Self {
        let has_more = !entries.is_empty();
        Self { entries, has_more }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub files: Vec<String>,
    pub truncated: bool,
}

/// Filenames from one page with new content under the source path
pub fn extract_filenames(entries: &[ChangedFile], filter: &SourceFilter) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.status.has_new_content())
        .map(|entry| normalize(&entry.filename))
        .filter(|name| filter.matches(name))
        .collect()
}

/// Fetch pages 1..=MAX_PAGE until one reports no more entries.
///
/// Results keep first-seen order across pages.
pub(crate) async fn collect_pages<F, Fut>(
    source_path: &str,
    mut fetch: F,
) -> Result<Collected, ChangeSetError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page, ChangeSetError>>,
{
    let filter = SourceFilter::new(source_path);
    let mut seen = HashSet::new();
    let mut collected = Collected::default();
    let mut exhausted = false;

    for page in 1..=MAX_PAGE {
        let Page { entries, has_more } = fetch(page).await?;
        debug!("Page {} returned {} entries", page, entries.len());

        for name in extract_filenames(&entries, &filter) {
            if seen.insert(name.clone()) {
                collected.files.push(name);
            }
        }

        if !has_more {
            exhausted = true;
            break;
        }
    }

    if !exhausted {
        warn!(
            "Stopped after {} pages of changed files; the change set may be incomplete",
            MAX_PAGE
        );
        collected.truncated = true;
    }

    Ok(collected)
}

pub struct ChangeSetResolver<'a> {
    api: &'a dyn GitHubApi,
    repo: RepoId,
}

impl<'a> ChangeSetResolver<'a> {
    pub fn new(api: &'a dyn GitHubApi, repo: RepoId) -> Self {
        Self { api, repo }
    }

    /// Changed files for the event, filtered to `source_path`
    pub async fn resolve(
        &self,
        event: &Event,
        source_path: &str,
    ) -> Result<ChangeSet, ChangeSetError> {
        let api = self.api;
        let repo = &self.repo;

        let collected = match event {
            Event::PullRequest { number } => {
                let number = *number;
                info!("Determining files changed in pull request #{}", number);
                collect_pages(source_path, move |page| async move {
                    api.list_pull_files(repo, number, PAGE_SIZE, page)
                        .await
                        .map(Page::from_entries)
                        .map_err(|source| ChangeSetError::Pagination { page, source })
                })
                .await?
            }
            Event::Push { before, after } => {
                let basehead = format!("{}...{}", before, after);
                let basehead = basehead.as_str();
                info!("Determining files changed in {}", basehead);
                collect_pages(source_path, move |page| async move {
                    api.compare_commits(repo, basehead, PAGE_SIZE, page)
                        .await
                        .map(|cmp| Page::from_entries(cmp.files.unwrap_or_default()))
                        .map_err(|source| ChangeSetError::Pagination { page, source })
                })
                .await?
            }
            Event::Other(name) => {
                info!(
                    "Event '{}' has no change set, analyzing the whole source path",
                    name
                );
                return Ok(ChangeSet::Unsupported);
            }
        };

        info!("Found {} changed files", collected.files.len());
        Ok(ChangeSet::Files {
            files: collected.files,
            truncated: collected.truncated,
        })
    }
}
