mod defaults;
mod types;

pub use defaults::PUBLIC_API_URL;
pub use types::*;

use crate::error::ConfigError;
use crate::tool::VersionRequest;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            download_url: None,
            source_path: default_source_path(),
            rulesets: default_rulesets(),
            analyze_modified_files_only: true,
            report_format: ReportFormat::default(),
            report_file: default_report_file(),
            minimum_priority: default_minimum_priority(),
            api_url: default_api_url(),
            tool_cache: default_tool_cache(),
            timeout_sec: None,
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if present, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        VersionRequest::parse(&self.version)
            .ok_or_else(|| ConfigError::InvalidVersion(self.version.clone()))?;

        if self.rulesets.trim().is_empty() {
            return Err(ConfigError::EmptyRulesets);
        }

        if self.source_path.trim().is_empty() {
            return Err(ConfigError::EmptySourcePath);
        }

        if !(1..=5).contains(&self.minimum_priority) {
            return Err(ConfigError::InvalidPriority(self.minimum_priority));
        }

        Ok(())
    }

    /// JSON Schema of the config file
    pub fn json_schema() -> serde_json::Result<String> {
        serde_json::to_string_pretty(&schemars::schema_for!(Config))
    }

    /// The download URL, with blank values treated as absent
    pub fn download_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}
