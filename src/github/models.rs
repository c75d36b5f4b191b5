use serde::{Deserialize, Serialize};

/// `owner/name` pair identifying a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (owner, name) = s.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Other,
}

impl ChangeStatus {
    /// Statuses whose file content is present and new or different
    pub fn has_new_content(self) -> bool {
        matches!(
            self,
            ChangeStatus::Added | ChangeStatus::Changed | ChangeStatus::Modified
        )
    }
}

/// One row of a pull request files or compare response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: ChangeStatus,
}

#[cfg(test)]
impl ChangedFile {
    pub fn new(filename: &str, status: ChangeStatus) -> Self {
        Self {
            filename: filename.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Comparison {
    #[serde(default)]
    pub files: Option<Vec<ChangedFile>>,
}
