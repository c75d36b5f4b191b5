use crate::cli::ResolveArgs;
use crate::config::PUBLIC_API_URL;
use crate::github::RestClient;
use crate::tool::{registry_token, ArtifactResolver, ToolCache, VersionRequest};

pub async fn execute(args: ResolveArgs) -> anyhow::Result<()> {
    let mut config = args.common.load_config()?;
    args.tool.apply(&mut config);
    config.validate()?;

    let request = VersionRequest::parse(&config.version)
        .ok_or_else(|| anyhow::anyhow!("Invalid version '{}'", config.version))?;

    let token = registry_token(&config.api_url, args.common.token.as_deref());
    let registry = RestClient::new(PUBLIC_API_URL, token)?;
    let cache = ToolCache::new(&config.tool_cache);

    // The printed path has to outlive this process
    let tool = ArtifactResolver::new(&registry, &cache)
        .resolve(&request, config.download_url())
        .await?
        .persist();

    println!("{}", serde_json::to_string_pretty(&tool)?);
    Ok(())
}
