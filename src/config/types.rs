use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// PMD version to run, or "latest"
    #[serde(default = "default_version")]
    pub version: String,

    /// Explicit PMD distribution zip; requires a concrete version
    #[serde(default)]
    pub download_url: Option<String>,

    #[serde(default = "default_source_path")]
    pub source_path: String,

    /// Comma-separated ruleset references passed to `-R`
    #[serde(default = "default_rulesets")]
    pub rulesets: String,

    #[serde(default = "default_true")]
    pub analyze_modified_files_only: bool,

    #[serde(default)]
    pub report_format: ReportFormat,

    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,

    #[serde(default = "default_minimum_priority")]
    pub minimum_priority: u8,

    /// API endpoint of the acting workflow identity
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_tool_cache")]
    pub tool_cache: PathBuf,

    #[serde(default)]
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Sarif,
    Xml,
    Json,
    Text,
    Html,
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Sarif => write!(f, "sarif"),
            ReportFormat::Xml => write!(f, "xml"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sarif" => Ok(ReportFormat::Sarif),
            "xml" => Ok(ReportFormat::Xml),
            "json" => Ok(ReportFormat::Json),
            "text" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}
