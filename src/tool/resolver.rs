use super::cache::{extract_to_temp, first_entry, ToolCache};
use super::version::VersionRequest;
use super::{Resolved, ToolInfo};
use crate::config::PUBLIC_API_URL;
use crate::error::ResolveError;
use crate::github::{GitHubApi, Release, RepoId};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const TOOL_NAME: &str = "pmd";

const RELEASE_OWNER: &str = "pmd";
const RELEASE_REPO: &str = "pmd";
const TAG_PREFIX: &str = "pmd_releases/";

/// Token to use against the public release registry.
///
/// A token issued for another endpoint (e.g. GitHub Enterprise Server) is
/// not valid on the public API, so registry lookups go unauthenticated.
pub fn registry_token<'t>(api_url: &str, token: Option<&'t str>) -> Option<&'t str> {
    if api_url.trim_end_matches('/') == PUBLIC_API_URL {
        token.filter(|t| !t.is_empty())
    } else {
        debug!(
            "API endpoint {} is not {}, querying releases unauthenticated",
            api_url, PUBLIC_API_URL
        );
        None
    }
}

/// Version number from a release tag such as `pmd_releases/6.55.0`
pub fn version_from_tag(tag: &str) -> String {
    tag.strip_prefix(TAG_PREFIX).unwrap_or(tag).to_string()
}

/// Asset names used by PMD distributions, old and new convention
pub fn asset_names(version: &str) -> [String; 2] {
    [
        format!("pmd-bin-{}.zip", version),
        format!("pmd-dist-{}-bin.zip", version),
    ]
}

pub struct ArtifactResolver<'a> {
    registry: &'a dyn GitHubApi,
    cache: &'a ToolCache,
}

impl<'a> ArtifactResolver<'a> {
    pub fn new(registry: &'a dyn GitHubApi, cache: &'a ToolCache) -> Self {
        Self { registry, cache }
    }

    /// Resolve a version request to an extracted PMD distribution.
    ///
    /// Distributions fetched from a download URL are not cached; they live in
    /// a temporary directory owned by the returned value.
    pub async fn resolve(
        &self,
        request: &VersionRequest,
        download_url: Option<&str>,
    ) -> Result<Resolved, ResolveError> {
        match download_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => match request {
                VersionRequest::Latest => Err(ResolveError::InvalidArgument(
                    "a download URL requires a concrete version, not 'latest'".to_string(),
                )),
                VersionRequest::Exact(version) => self.from_url(version, url).await,
            },
            None => self.from_release(request).await,
        }
    }

    async fn from_url(&self, version: &str, url: &str) -> Result<Resolved, ResolveError> {
        info!("Downloading PMD {} from {}", version, url);
        let archive = self.download(url).await?;
        let extracted = extract_to_temp(archive.path())?;
        let root = first_entry(extracted.path())?
            .ok_or_else(|| ResolveError::EmptyArchive(url.to_string()))?;

        info!("Using PMD {} from {}", version, root.display());
        let tool = ToolInfo {
            version: version.to_string(),
            path: root,
        };
        Ok(Resolved::temporary(tool, extracted))
    }

    async fn from_release(&self, request: &VersionRequest) -> Result<Resolved, ResolveError> {
        if let VersionRequest::Exact(version) = request {
            if let Some(cached) = self.cached(version) {
                return Ok(Resolved::cached(cached));
            }
        }

        let release = self.lookup_release(request).await?;
        let version = version_from_tag(&release.tag_name);
        debug!("Release {} resolves to PMD {}", release.tag_name, version);

        // "latest" can only hit the cache once its concrete version is known
        if request.is_latest() {
            if let Some(cached) = self.cached(&version) {
                return Ok(Resolved::cached(cached));
            }
        }

        let url = select_asset(&release, &version)?;
        info!("Downloading PMD {} from {}", version, url);
        let archive = self.download(url).await?;
        let cached = self.cache.install(archive.path(), TOOL_NAME, &version)?;

        let path = cached.join(format!("pmd-bin-{}", version));
        info!("Using PMD {} from {}", version, path.display());
        Ok(Resolved::cached(ToolInfo { version, path }))
    }

    fn cached(&self, version: &str) -> Option<ToolInfo> {
        let dir = self.cache.find(TOOL_NAME, version)?;
        let path = dir.join(format!("pmd-bin-{}", version));
        info!("Using cached PMD {} from {}", version, path.display());
        Some(ToolInfo {
            version: version.to_string(),
            path,
        })
    }

    async fn lookup_release(&self, request: &VersionRequest) -> Result<Release, ResolveError> {
        let repo = RepoId::new(RELEASE_OWNER, RELEASE_REPO);
        let release = match request {
            VersionRequest::Latest => self.registry.latest_release(&repo).await?,
            VersionRequest::Exact(version) => {
                let tag = format!("{}{}", TAG_PREFIX, version);
                self.registry.release_by_tag(&repo, &tag).await?
            }
        };
        Ok(release)
    }

    async fn download(&self, url: &str) -> Result<NamedTempFile, ResolveError> {
        let archive = tempfile::Builder::new()
            .prefix("pmd-")
            .suffix(".zip")
            .tempfile_in(self.cache.work_dir()?)?;
        self.registry.download(url, archive.path()).await?;
        Ok(archive)
    }
}

fn select_asset<'r>(release: &'r Release, version: &str) -> Result<&'r str, ResolveError> {
    let names = asset_names(version);
    release
        .assets
        .iter()
        .find(|asset| names.contains(&asset.name))
        .map(|asset| asset.browser_download_url.as_str())
        .ok_or_else(|| ResolveError::NoMatchingAsset {
            tag: release.tag_name.clone(),
            expected: names.to_vec(),
        })
}
