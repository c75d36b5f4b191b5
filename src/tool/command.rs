use super::version::{CliDialect, Platform};
use super::ToolInfo;
use crate::config::ReportFormat;
use crate::error::CommandError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the file list handed to PMD, relative to the working directory
pub const FILE_LIST_NAME: &str = "pmd.filelist";

/// What PMD should analyze
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelector {
    Path(String),
    FileList(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub rulesets: String,
    pub report_format: ReportFormat,
    pub report_file: PathBuf,
    pub minimum_priority: u8,
    /// Directory the file list is written to
    pub work_dir: PathBuf,
}

/// A fully built PMD command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    /// Entry point segment: `pmd` or `check --no-progress`
    pub prefix: Vec<String>,
    pub args: Vec<String>,
}

impl Invocation {
    /// Complete argument vector as passed to the process
    pub fn argv(&self) -> Vec<String> {
        self.prefix.iter().chain(self.args.iter()).cloned().collect()
    }

    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in self.argv() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// Build the PMD invocation for the given distribution.
///
/// Writes the file list to `options.work_dir` when the selector is a list.
pub fn build(
    tool: &ToolInfo,
    selector: &SourceSelector,
    options: &AnalysisOptions,
    platform: Platform,
) -> Result<Invocation, CommandError> {
    let dialect = CliDialect::select(&tool.version, platform);
    debug!("PMD {} uses {:?}", tool.version, dialect);

    let program = dialect
        .executable()
        .iter()
        .fold(tool.path.clone(), |path, segment| path.join(segment));
    let prefix = dialect.entry_args().iter().map(|s| s.to_string()).collect();

    let mut args = vec![dialect.no_cache_flag().to_string()];

    match selector {
        SourceSelector::FileList(files) => {
            let list_path = write_file_list(&options.work_dir, files)?;
            args.push(dialect.file_list_flag().to_string());
            args.push(list_path.display().to_string());
        }
        SourceSelector::Path(path) => {
            args.push("-d".to_string());
            args.push(path.clone());
        }
    }

    args.extend([
        "-f".to_string(),
        options.report_format.to_string(),
        "-R".to_string(),
        options.rulesets.clone(),
        "-r".to_string(),
        options.report_file.display().to_string(),
        "--minimum-priority".to_string(),
        options.minimum_priority.to_string(),
    ]);

    Ok(Invocation {
        program,
        prefix,
        args,
    })
}

fn write_file_list(work_dir: &Path, files: &[String]) -> Result<PathBuf, CommandError> {
    let path = work_dir.join(FILE_LIST_NAME);
    std::fs::write(&path, files.join(",")).map_err(|e| CommandError::WriteFileList {
        path: path.clone(),
        source: e,
    })?;
    debug!("Wrote {} files to {}", files.len(), path.display());
    Ok(path)
}
