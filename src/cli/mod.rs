pub mod changed_files;
pub mod resolve;
pub mod run;
pub mod schema;

use crate::config::{Config, ReportFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pmdgate")]
#[command(
    author,
    version,
    about = "Run PMD in CI with version-correct arguments, scoped to changed files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve PMD, determine changed files and run the analysis
    Run(RunArgs),

    /// Print the files changed by the triggering event
    ChangedFiles(ChangedFilesArgs),

    /// Download (or find in cache) a PMD distribution and print its location
    Resolve(ResolveArgs),

    /// Print JSON Schema for config validation
    Schema,
}

/// Options shared by every command that talks to GitHub
#[derive(Args, Clone)]
pub struct CommonArgs {
    /// Path to config file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "pmdgate.yaml")]
    pub config: PathBuf,

    /// Directory (or file) to analyze, relative to the repository root
    #[arg(long)]
    pub source_path: Option<String>,

    /// API endpoint of the workflow's GitHub instance
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl CommonArgs {
    /// Load the config file and apply command line overrides
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        if let Some(source_path) = &self.source_path {
            config.source_path = source_path.clone();
        }
        if let Some(api_url) = self.api_url.as_ref().filter(|u| !u.is_empty()) {
            config.api_url = api_url.clone();
        }
        Ok(config)
    }
}

#[derive(Args, Clone)]
pub struct ToolArgs {
    /// PMD version to use, or "latest"
    #[arg(long)]
    pub pmd_version: Option<String>,

    /// Download PMD from this zip instead of the release registry
    #[arg(long)]
    pub download_url: Option<String>,

    /// Root of the tool cache
    #[arg(long, env = "RUNNER_TOOL_CACHE")]
    pub tool_cache: Option<PathBuf>,
}

impl ToolArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(version) = &self.pmd_version {
            config.version = version.clone();
        }
        if let Some(url) = &self.download_url {
            config.download_url = Some(url.clone());
        }
        if let Some(dir) = self.tool_cache.as_ref().filter(|d| !d.as_os_str().is_empty()) {
            config.tool_cache = dir.clone();
        }
    }
}

/// The triggering workflow event
#[derive(Args, Clone)]
pub struct EventArgs {
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// JSON payload of the event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub tool: ToolArgs,

    #[command(flatten)]
    pub event: EventArgs,

    /// Comma-separated rulesets
    #[arg(long)]
    pub rulesets: Option<String>,

    /// Only analyze files changed by the pull request or push
    #[arg(long)]
    pub analyze_modified_files_only: Option<bool>,

    #[arg(long)]
    pub report_format: Option<ReportFormat>,

    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Lowest rule priority to report (1 = highest)
    #[arg(long)]
    pub minimum_priority: Option<u8>,

    /// Abort PMD after this many seconds
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Exit 1 if PMD reports violations (CI mode)
    #[arg(long)]
    pub fail_on_violation: bool,

    /// Step outputs file
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Step summary file
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub step_summary: Option<PathBuf>,
}

impl RunArgs {
    pub fn apply(&self, config: &mut Config) {
        self.tool.apply(config);
        if let Some(rulesets) = &self.rulesets {
            config.rulesets = rulesets.clone();
        }
        if let Some(only) = self.analyze_modified_files_only {
            config.analyze_modified_files_only = only;
        }
        if let Some(format) = self.report_format {
            config.report_format = format;
        }
        if let Some(report_file) = &self.report_file {
            config.report_file = report_file.clone();
        }
        if let Some(priority) = self.minimum_priority {
            config.minimum_priority = priority;
        }
        if let Some(timeout) = self.timeout_sec {
            config.timeout_sec = Some(timeout);
        }
    }
}

#[derive(Parser, Clone)]
pub struct ChangedFilesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub event: EventArgs,
}

#[derive(Parser, Clone)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub tool: ToolArgs,
}
