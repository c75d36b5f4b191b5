use std::path::PathBuf;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum PmdGateError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Change set error: {0}")]
    ChangeSet(#[from] ChangeSetError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid version '{0}': expected 'latest' or MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    #[error("No rulesets configured")]
    EmptyRulesets,

    #[error("Source path must not be empty")]
    EmptySourcePath,

    #[error("Minimum priority must be between 1 and 5, got {0}")]
    InvalidPriority(u8),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Release lookup failed: {0}")]
    Registry(#[from] GitHubError),

    #[error("Release '{tag}' has no asset named {expected:?}")]
    NoMatchingAsset { tag: String, expected: Vec<String> },

    #[error("Archive from {0} contains no entries")]
    EmptyArchive(String),

    #[error("Failed to extract archive: {0}")]
    Extract(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Everything except conflicting inputs counts as a resolution failure
    pub fn is_resolution_failure(&self) -> bool {
        !matches!(self, ResolveError::InvalidArgument(_))
    }
}

#[derive(Error, Debug)]
pub enum ChangeSetError {
    #[error("Failed to fetch page {page} of changed files: {source}")]
    Pagination {
        page: u32,
        #[source]
        source: GitHubError,
    },

    #[error("Invalid event payload: {0}")]
    Event(String),
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to write file list '{path}': {source}")]
    WriteFileList {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Execution timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write step outputs: {0}")]
    WriteOutputs(std::io::Error),

    #[error("Failed to write step summary: {0}")]
    WriteSummary(std::io::Error),
}

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    ParseOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
