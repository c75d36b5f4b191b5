use crate::error::OutputError;
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed { exit_code: i32 },
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub pmd_version: String,
    pub source_path: String,
    /// None when the whole source path was analyzed
    pub files_analyzed: Option<usize>,
    /// The changed file listing hit its page limit
    pub files_truncated: bool,
    pub report_file: PathBuf,
    pub duration_sec: f64,
    #[serde(flatten)]
    pub status: RunStatus,
}

impl RunSummary {
    pub fn new(
        pmd_version: &str,
        source_path: &str,
        files_analyzed: Option<usize>,
        report_file: &Path,
        status: RunStatus,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            pmd_version: pmd_version.to_string(),
            source_path: source_path.to_string(),
            files_analyzed,
            files_truncated: false,
            report_file: report_file.to_path_buf(),
            duration_sec: 0.0,
            status,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Completed { exit_code } => exit_code,
            RunStatus::Skipped { .. } => 0,
        }
    }
}

/// Append step outputs in `key=value` form (the `GITHUB_OUTPUT` file format)
pub fn write_outputs(path: &Path, summary: &RunSummary) -> Result<(), OutputError> {
    let mut lines = String::new();
    lines.push_str(&format!("exit-code={}\n", summary.exit_code()));
    lines.push_str(&format!("pmd-version={}\n", summary.pmd_version));
    lines.push_str(&format!(
        "report-file={}\n",
        summary.report_file.display()
    ));
    if let Some(count) = summary.files_analyzed {
        lines.push_str(&format!("files-analyzed={}\n", count));
    }
    if summary.files_truncated {
        lines.push_str("files-truncated=true\n");
    }
    append(path, &lines).map_err(OutputError::WriteOutputs)
}

/// Append a markdown run summary (the `GITHUB_STEP_SUMMARY` file)
pub fn write_step_summary(path: &Path, summary: &RunSummary) -> Result<(), OutputError> {
    append(path, &build_summary_markdown(summary)).map_err(OutputError::WriteSummary)
}

fn append(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())
}

fn build_summary_markdown(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("## PMD Summary\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!("| PMD Version | {} |\n", summary.pmd_version));
    md.push_str(&format!("| Source Path | `{}` |\n", summary.source_path));

    let scope = match summary.files_analyzed {
        Some(count) if summary.files_truncated => {
            format!("{} changed files (listing truncated)", count)
        }
        Some(count) => format!("{} changed files", count),
        None => "full source path".to_string(),
    };
    md.push_str(&format!("| Scope | {} |\n", scope));

    let status = match &summary.status {
        RunStatus::Completed { exit_code: 0 } => "✅ no violations".to_string(),
        RunStatus::Completed { exit_code } => format!("⚠️ exit code {}", exit_code),
        RunStatus::Skipped { reason } => format!("⏭️ skipped ({})", reason),
    };
    md.push_str(&format!("| Status | {} |\n", status));

    if matches!(summary.status, RunStatus::Completed { .. }) {
        md.push_str(&format!(
            "| Report | `{}` |\n",
            summary.report_file.display()
        ));
        md.push_str(&format!("| Duration | {:.1}s |\n", summary.duration_sec));
    }
    md.push_str(&format!("\n*Generated {}*\n", summary.timestamp));

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(exit_code: i32) -> RunSummary {
        RunSummary::new(
            "7.1.0",
            "src/main/java",
            Some(3),
            Path::new("pmd-report.sarif"),
            RunStatus::Completed { exit_code },
        )
    }

    #[test]
    fn test_outputs_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=1\n").unwrap();

        write_outputs(&path, &completed(4)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "previous=1\nexit-code=4\npmd-version=7.1.0\nreport-file=pmd-report.sarif\nfiles-analyzed=3\n"
        );
    }

    #[test]
    fn test_truncated_listing_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        let mut summary = completed(0);
        summary.files_truncated = true;

        write_outputs(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("files-analyzed=3\nfiles-truncated=true\n"));
        assert!(build_summary_markdown(&summary).contains("3 changed files (listing truncated)"));
    }

    #[test]
    fn test_skipped_run_exits_zero() {
        let summary = RunSummary::new(
            "6.55.0",
            ".",
            Some(0),
            Path::new("pmd-report.sarif"),
            RunStatus::Skipped {
                reason: "no modified files".to_string(),
            },
        );
        assert_eq!(summary.exit_code(), 0);

        let md = build_summary_markdown(&summary);
        assert!(md.contains("skipped (no modified files)"));
        assert!(!md.contains("| Report |"));
    }

    #[test]
    fn test_summary_markdown_for_full_scan() {
        let mut summary = completed(0);
        summary.files_analyzed = None;
        let md = build_summary_markdown(&summary);
        assert!(md.contains("| Scope | full source path |"));
        assert!(md.contains("no violations"));
    }

    #[test]
    fn test_summary_serializes_status_inline() {
        let json = serde_json::to_value(completed(0)).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["exit_code"], 0);
    }
}
