use crate::error::ChangeSetError;
use serde::Deserialize;
use std::path::Path;

/// The workflow event that triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PullRequest { number: u64 },
    Push { before: String, after: String },
    Other(String),
}

#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    before: Option<String>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
}

impl Event {
    /// Interpret an event payload for the given event name
    pub fn from_payload(name: &str, payload: &str) -> Result<Self, ChangeSetError> {
        match name {
            "pull_request" | "push" => {}
            other => return Ok(Event::Other(other.to_string())),
        }

        let payload: Payload =
            serde_json::from_str(payload).map_err(|e| ChangeSetError::Event(e.to_string()))?;

        if name == "pull_request" {
            let pr = payload
                .pull_request
                .ok_or_else(|| ChangeSetError::Event("missing pull_request".to_string()))?;
            return Ok(Event::PullRequest { number: pr.number });
        }

        match (payload.before, payload.after) {
            (Some(before), Some(after)) => Ok(Event::Push { before, after }),
            _ => Err(ChangeSetError::Event(
                "push payload without before/after".to_string(),
            )),
        }
    }

    /// Read `GITHUB_EVENT_PATH`-style payload files
    pub fn load(name: &str, payload_path: Option<&Path>) -> Result<Self, ChangeSetError> {
        if !matches!(name, "pull_request" | "push") {
            return Ok(Event::Other(name.to_string()));
        }
        let path = payload_path
            .ok_or_else(|| ChangeSetError::Event(format!("no payload for '{}' event", name)))?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChangeSetError::Event(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_payload(name, &content)
    }

    pub fn name(&self) -> &str {
        match self {
            Event::PullRequest { .. } => "pull_request",
            Event::Push { .. } => "push",
            Event::Other(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_payload() {
        let payload = r#"{"action": "opened", "pull_request": {"number": 42, "title": "x"}}"#;
        let event = Event::from_payload("pull_request", payload).unwrap();
        assert_eq!(event, Event::PullRequest { number: 42 });
    }

    #[test]
    fn test_push_payload() {
        let payload = r#"{"ref": "refs/heads/main", "before": "aaa", "after": "bbb"}"#;
        let event = Event::from_payload("push", payload).unwrap();
        assert_eq!(
            event,
            Event::Push {
                before: "aaa".to_string(),
                after: "bbb".to_string()
            }
        );
    }

    #[test]
    fn test_other_event_ignores_payload() {
        let event = Event::from_payload("workflow_dispatch", "not json").unwrap();
        assert_eq!(event, Event::Other("workflow_dispatch".to_string()));
        assert_eq!(event.name(), "workflow_dispatch");
    }

    #[test]
    fn test_push_without_shas_is_error() {
        let result = Event::from_payload("push", r#"{"ref": "refs/heads/main"}"#);
        assert!(matches!(result, Err(ChangeSetError::Event(_))));
    }

    #[test]
    fn test_load_requires_payload_for_pull_request() {
        assert!(Event::load("pull_request", None).is_err());
        assert_eq!(
            Event::load("schedule", None).unwrap(),
            Event::Other("schedule".to_string())
        );
    }
}
