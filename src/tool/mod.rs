mod cache;
mod command;
mod resolver;
mod version;

pub use cache::ToolCache;
pub use command::{build, AnalysisOptions, Invocation, SourceSelector};
pub use resolver::{registry_token, ArtifactResolver};
pub use version::{Platform, VersionRequest};

use serde::Serialize;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::debug;

/// A resolved PMD distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    /// Concrete version, even when "latest" was requested
    pub version: String,
    /// Distribution root containing `bin/`
    pub path: PathBuf,
}

/// A resolved distribution, owning the temporary directory of an uncached one
#[derive(Debug)]
pub struct Resolved {
    pub tool: ToolInfo,
    scratch: Option<TempDir>,
}

impl Resolved {
    fn cached(tool: ToolInfo) -> Self {
        Self {
            tool,
            scratch: None,
        }
    }

    fn temporary(tool: ToolInfo, scratch: TempDir) -> Self {
        Self {
            tool,
            scratch: Some(scratch),
        }
    }

    /// Leave a temporary distribution on disk after this value is gone
    pub fn persist(self) -> ToolInfo {
        if let Some(scratch) = self.scratch {
            let kept = scratch.keep();
            debug!("Keeping {} after exit", kept.display());
        }
        self.tool
    }
}
