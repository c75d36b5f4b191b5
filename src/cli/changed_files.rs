use crate::cli::{ChangedFilesArgs, EventArgs};
use crate::discovery::{ChangeSet, ChangeSetResolver};
use crate::github::{Event, GitHubApi, RepoId, RestClient};
use tracing::info;

pub async fn execute(args: ChangedFilesArgs) -> anyhow::Result<()> {
    let config = args.common.load_config()?;
    let api = RestClient::new(&config.api_url, args.common.token.as_deref())?;

    match resolve_change_set(&args.event, &api, &config.source_path).await? {
        ChangeSet::Files { files, .. } => {
            for file in files {
                println!("{}", file);
            }
        }
        ChangeSet::Unsupported => println!("<unsupported>"),
    }

    Ok(())
}

/// Change set for the triggering event, or `Unsupported` without one
pub(crate) async fn resolve_change_set(
    args: &EventArgs,
    api: &dyn GitHubApi,
    source_path: &str,
) -> anyhow::Result<ChangeSet> {
    let Some(name) = args.event_name.as_deref().filter(|n| !n.is_empty()) else {
        info!("No event name available, analyzing the whole source path");
        return Ok(ChangeSet::Unsupported);
    };

    let event = Event::load(name, args.event_path.as_deref())?;
    let repo = match args.repository.as_deref().and_then(RepoId::parse) {
        Some(repo) => repo,
        None if matches!(event, Event::Other(_)) => {
            info!("Event '{}' has no change set", event.name());
            return Ok(ChangeSet::Unsupported);
        }
        None => anyhow::bail!(
            "GITHUB_REPOSITORY must be set as owner/name for '{}' events",
            event.name()
        ),
    };

    Ok(ChangeSetResolver::new(api, repo)
        .resolve(&event, source_path)
        .await?)
}
