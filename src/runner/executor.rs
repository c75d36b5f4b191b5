use crate::error::ExecError;
use crate::tool::Invocation;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, info};

#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    /// PMD exits non-zero when it finds violations
    pub exit_code: i32,
}

/// Run the invocation to completion; a non-zero exit code is not an error
pub async fn execute(
    invocation: &Invocation,
    timeout: Option<Duration>,
) -> Result<ToolOutput, ExecError> {
    info!("Running {}", invocation.display());

    let mut cmd = Command::new(&invocation.program);
    cmd.args(invocation.argv()).kill_on_drop(true);

    let start = std::time::Instant::now();
    let spawn_error = |e| ExecError::Spawn {
        program: invocation.program.clone(),
        source: e,
    };

    let output = match timeout {
        Some(limit) => tokio_timeout(limit, cmd.output())
            .await
            .map_err(|_| ExecError::Timeout(limit))?
            .map_err(spawn_error)?,
        None => cmd.output().await.map_err(spawn_error)?,
    };

    let result = ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        exit_code: output.status.code().unwrap_or(-1),
    };

    debug!(
        "{} exited with {} after {:?}",
        invocation.program.display(),
        result.exit_code,
        result.duration
    );
    Ok(result)
}
