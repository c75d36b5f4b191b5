use crate::cli::changed_files::resolve_change_set;
use crate::cli::{EventArgs, RunArgs};
use crate::config::{Config, PUBLIC_API_URL};
use crate::discovery::ChangeSet;
use crate::github::{GitHubApi, RestClient};
use crate::output::{write_outputs, write_step_summary, RunStatus, RunSummary};
use crate::runner;
use crate::tool::{
    self, registry_token, AnalysisOptions, ArtifactResolver, Platform, SourceSelector, ToolCache,
    ToolInfo, VersionRequest,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How a PMD exit code is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Clean,
    Violations,
    /// Some files could not be processed (PMD 7)
    ProcessingErrors,
    Failed,
}

fn classify_exit(code: i32) -> Outcome {
    match code {
        0 => Outcome::Clean,
        4 => Outcome::Violations,
        5 => Outcome::ProcessingErrors,
        _ => Outcome::Failed,
    }
}

/// What a run hands to PMD
#[derive(Debug, PartialEq, Eq)]
enum Scope {
    /// The event changed nothing under the source path
    NothingChanged,
    Analyze {
        selector: SourceSelector,
        truncated: bool,
    },
}

async fn select_scope(
    config: &Config,
    event: &EventArgs,
    api: &dyn GitHubApi,
) -> anyhow::Result<Scope> {
    let whole_path = Scope::Analyze {
        selector: SourceSelector::Path(config.source_path.clone()),
        truncated: false,
    };
    if !config.analyze_modified_files_only {
        return Ok(whole_path);
    }

    let scope = match resolve_change_set(event, api, &config.source_path).await? {
        ChangeSet::Files { files, .. } if files.is_empty() => Scope::NothingChanged,
        ChangeSet::Files { files, truncated } => Scope::Analyze {
            selector: SourceSelector::FileList(files),
            truncated,
        },
        ChangeSet::Unsupported => whole_path,
    };
    Ok(scope)
}

fn skipped_summary(tool: &ToolInfo, config: &Config) -> RunSummary {
    RunSummary::new(
        &tool.version,
        &config.source_path,
        Some(0),
        &config.report_file,
        RunStatus::Skipped {
            reason: "no modified files".to_string(),
        },
    )
}

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    info!("Loading config from {:?}", args.common.config);
    let mut config = args.common.load_config()?;
    args.apply(&mut config);
    config.validate()?;

    let request = VersionRequest::parse(&config.version)
        .ok_or_else(|| anyhow::anyhow!("Invalid version '{}'", config.version))?;
    let token = args.common.token.as_deref();

    // PMD releases only live on the public registry
    let registry = RestClient::new(PUBLIC_API_URL, registry_token(&config.api_url, token))?;
    let cache = ToolCache::new(&config.tool_cache);
    let resolved = ArtifactResolver::new(&registry, &cache)
        .resolve(&request, config.download_url())
        .await
        .inspect_err(|e| {
            if e.is_resolution_failure() {
                error!("Could not obtain PMD {} (cache: {:?})", request, config.tool_cache);
            }
        })?;
    let tool = &resolved.tool;

    let api = RestClient::new(&config.api_url, token)?;
    let (selector, truncated) = match select_scope(&config, &args.event, &api).await? {
        Scope::NothingChanged => {
            info!("No modified files have been found to be analyzed");
            publish(&args, &skipped_summary(tool, &config))?;
            return Ok(());
        }
        Scope::Analyze {
            selector,
            truncated,
        } => (selector, truncated),
    };

    let files_analyzed = match &selector {
        SourceSelector::FileList(files) => {
            info!("Analyzing {} modified files", files.len());
            Some(files.len())
        }
        SourceSelector::Path(path) => {
            info!("Analyzing all files under {}", path);
            None
        }
    };

    let options = AnalysisOptions {
        rulesets: config.rulesets.clone(),
        report_format: config.report_format,
        report_file: config.report_file.clone(),
        minimum_priority: config.minimum_priority,
        work_dir: PathBuf::from("."),
    };
    let invocation = tool::build(tool, &selector, &options, Platform::current())?;

    let output = runner::execute(&invocation, config.timeout_sec.map(Duration::from_secs)).await?;
    if !output.stdout.is_empty() {
        debug!("PMD stdout:\n{}", output.stdout);
    }

    let mut summary = RunSummary::new(
        &tool.version,
        &config.source_path,
        files_analyzed,
        &config.report_file,
        RunStatus::Completed {
            exit_code: output.exit_code,
        },
    );
    summary.files_truncated = truncated;
    summary.duration_sec = output.duration.as_secs_f64();
    publish(&args, &summary)?;

    let fail = match classify_exit(output.exit_code) {
        Outcome::Clean => {
            info!(
                "PMD {} found no violations in {:.1}s",
                tool.version, summary.duration_sec
            );
            false
        }
        Outcome::Violations => {
            info!(
                "PMD {} reported violations, see {}",
                tool.version,
                config.report_file.display()
            );
            args.fail_on_violation
        }
        Outcome::ProcessingErrors => {
            warn!("PMD could not process some files:\n{}", output.stderr);
            args.fail_on_violation
        }
        Outcome::Failed => {
            anyhow::bail!(
                "PMD exited with code {}: {}",
                output.exit_code,
                output.stderr.trim()
            );
        }
    };

    if fail {
        error!("Exiting with error: PMD reported problems");
        // process::exit skips destructors, so release the distribution first
        drop(resolved);
        std::process::exit(1);
    }

    Ok(())
}

/// Write step outputs and summary where the runner asks for them
fn publish(args: &RunArgs, summary: &RunSummary) -> anyhow::Result<()> {
    if let Some(path) = &args.github_output {
        write_outputs(path, summary)?;
    }
    if let Some(path) = &args.step_summary {
        write_step_summary(path, summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitHubError;
    use crate::github::{ChangeStatus, ChangedFile, Comparison, Release, RepoId};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Pull request with a fixed first page of changed files
    #[derive(Default)]
    struct FakePullApi {
        files: Vec<ChangedFile>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GitHubApi for FakePullApi {
        async fn latest_release(&self, _repo: &RepoId) -> Result<Release, GitHubError> {
            unimplemented!("not used when selecting sources")
        }

        async fn release_by_tag(&self, _repo: &RepoId, _tag: &str) -> Result<Release, GitHubError> {
            unimplemented!("not used when selecting sources")
        }

        async fn list_pull_files(
            &self,
            _repo: &RepoId,
            _pull_number: u64,
            _per_page: u32,
            page: u32,
        ) -> Result<Vec<ChangedFile>, GitHubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if page == 1 {
                self.files.clone()
            } else {
                Vec::new()
            })
        }

        async fn compare_commits(
            &self,
            _repo: &RepoId,
            _basehead: &str,
            _per_page: u32,
            _page: u32,
        ) -> Result<Comparison, GitHubError> {
            unimplemented!("only pull request events are used here")
        }

        async fn download(&self, _url: &str, _dest: &Path) -> Result<(), GitHubError> {
            unimplemented!("not used when selecting sources")
        }
    }

    fn config(source_path: &str, modified_only: bool) -> Config {
        Config {
            source_path: source_path.to_string(),
            analyze_modified_files_only: modified_only,
            ..Config::default()
        }
    }

    fn pull_request_event(dir: &Path) -> EventArgs {
        let payload = dir.join("event.json");
        std::fs::write(&payload, r#"{"pull_request": {"number": 12}}"#).unwrap();
        EventArgs {
            event_name: Some("pull_request".to_string()),
            event_path: Some(payload),
            repository: Some("octo/project".to_string()),
        }
    }

    #[test]
    fn test_classify_exit_codes() {
        assert_eq!(classify_exit(0), Outcome::Clean);
        assert_eq!(classify_exit(4), Outcome::Violations);
        assert_eq!(classify_exit(5), Outcome::ProcessingErrors);
        assert_eq!(classify_exit(1), Outcome::Failed);
        assert_eq!(classify_exit(2), Outcome::Failed);
        assert_eq!(classify_exit(-1), Outcome::Failed);
    }

    #[tokio::test]
    async fn test_full_scan_does_not_query_changes() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakePullApi::default();

        let scope = select_scope(&config("src", false), &pull_request_event(dir.path()), &api)
            .await
            .unwrap();

        assert_eq!(
            scope,
            Scope::Analyze {
                selector: SourceSelector::Path("src".to_string()),
                truncated: false,
            }
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_event_falls_back_to_source_path() {
        let api = FakePullApi::default();
        let event = EventArgs {
            event_name: Some("workflow_dispatch".to_string()),
            event_path: None,
            repository: Some("octo/project".to_string()),
        };

        let scope = select_scope(&config("src/main", true), &event, &api)
            .await
            .unwrap();

        assert_eq!(
            scope,
            Scope::Analyze {
                selector: SourceSelector::Path("src/main".to_string()),
                truncated: false,
            }
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_changed_files_become_file_list() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakePullApi {
            files: vec![
                ChangedFile::new("src/A.java", ChangeStatus::Modified),
                ChangedFile::new("docs/index.md", ChangeStatus::Modified),
            ],
            ..FakePullApi::default()
        };

        let scope = select_scope(&config("src", true), &pull_request_event(dir.path()), &api)
            .await
            .unwrap();

        match scope {
            Scope::Analyze {
                selector: SourceSelector::FileList(files),
                truncated,
            } => {
                assert_eq!(files.len(), 1);
                assert!(files[0].ends_with("A.java"));
                assert!(!truncated);
            }
            other => panic!("expected a file list, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_matching_changes_skips_with_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakePullApi {
            files: vec![ChangedFile::new("docs/index.md", ChangeStatus::Added)],
            ..FakePullApi::default()
        };
        let config = config("src", true);

        let scope = select_scope(&config, &pull_request_event(dir.path()), &api)
            .await
            .unwrap();
        assert_eq!(scope, Scope::NothingChanged);

        let tool = ToolInfo {
            version: "7.1.0".to_string(),
            path: PathBuf::from("/opt/pmd"),
        };
        let outputs = dir.path().join("github_output");
        write_outputs(&outputs, &skipped_summary(&tool, &config)).unwrap();

        let content = std::fs::read_to_string(&outputs).unwrap();
        assert!(content.contains("exit-code=0\n"));
        assert!(content.contains("pmd-version=7.1.0\n"));
        assert!(content.contains("files-analyzed=0\n"));
    }
}
