use super::models::{ChangedFile, Comparison, Release, RepoId};
use crate::error::GitHubError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

const USER_AGENT: &str = concat!("pmdgate/", env!("CARGO_PKG_VERSION"));

/// The subset of the GitHub REST API this tool consumes
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn latest_release(&self, repo: &RepoId) -> Result<Release, GitHubError>;

    async fn release_by_tag(&self, repo: &RepoId, tag: &str) -> Result<Release, GitHubError>;

    async fn list_pull_files(
        &self,
        repo: &RepoId,
        pull_number: u64,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<ChangedFile>, GitHubError>;

    async fn compare_commits(
        &self,
        repo: &RepoId,
        basehead: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Comparison, GitHubError>;

    /// Download a release asset to `dest`
    async fn download(&self, url: &str, dest: &Path) -> Result<(), GitHubError>;
}

pub struct RestClient {
    base_url: String,
    http: reqwest::Client,
    /// Unauthenticated client for asset downloads, which may live on any host
    plain: reqwest::Client,
}

impl RestClient {
    /// Client for `base_url`, authenticated when a non-empty token is given
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static("2022-11-28"),
        );
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GitHubError::ParseOutput(format!("invalid token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        let plain = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            plain,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GitHubError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                method: "GET",
                url,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GitHubError::ParseOutput(e.to_string()))
    }
}

#[async_trait]
impl GitHubApi for RestClient {
    async fn latest_release(&self, repo: &RepoId) -> Result<Release, GitHubError> {
        self.get_json(&format!("/repos/{}/releases/latest", repo), &[])
            .await
    }

    async fn release_by_tag(&self, repo: &RepoId, tag: &str) -> Result<Release, GitHubError> {
        self.get_json(&format!("/repos/{}/releases/tags/{}", repo, tag), &[])
            .await
    }

    async fn list_pull_files(
        &self,
        repo: &RepoId,
        pull_number: u64,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<ChangedFile>, GitHubError> {
        self.get_json(
            &format!("/repos/{}/pulls/{}/files", repo, pull_number),
            &[("per_page", per_page.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn compare_commits(
        &self,
        repo: &RepoId,
        basehead: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Comparison, GitHubError> {
        self.get_json(
            &format!("/repos/{}/compare/{}", repo, basehead),
            &[("per_page", per_page.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), GitHubError> {
        debug!("Downloading {} to {}", url, dest.display());
        let response = self
            .plain
            .get(url)
            .header(ACCEPT, "application/octet-stream")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::Status {
                method: "GET",
                url: url.to_string(),
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}
