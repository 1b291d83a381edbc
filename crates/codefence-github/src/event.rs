use serde::Deserialize;
use std::fs;
use std::path::Path;

use codefence_config::UpdateTargets;
use codefence_core::{CommentAuthor, TargetKind};

use crate::{RepoRef, TrackerError};

/// The issue or pull request object carried by an event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventItem {
    pub number: u64,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventRepository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub owner: Option<CommentAuthor>,
}

/// The parts of a webhook payload this tool reads. Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<EventItem>,
    #[serde(default)]
    pub issue: Option<EventItem>,
    #[serde(default)]
    pub repository: Option<EventRepository>,
    #[serde(default)]
    pub sender: Option<CommentAuthor>,
}

impl EventPayload {
    pub fn from_value(value: serde_json::Value) -> Result<Self, TrackerError> {
        serde_json::from_value(value)
            .map_err(|e| TrackerError::Event(format!("unexpected payload shape: {e}")))
    }

    pub fn repository(&self) -> Option<RepoRef> {
        let repo = self.repository.as_ref()?;
        if let Some(full) = repo.full_name.as_deref().and_then(RepoRef::parse) {
            return Some(full);
        }
        let owner = repo.owner.as_ref()?.login.trim();
        if owner.is_empty() || repo.name.trim().is_empty() {
            return None;
        }
        Some(RepoRef::new(owner, repo.name.trim()))
    }
}

/// The issue or pull request a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub number: u64,
    pub kind: TargetKind,
    pub body: String,
}

/// Picks the body to check. A pull request wins over an issue when both are
/// present; a missing body counts as empty.
pub fn select_target(payload: &EventPayload, targets: &UpdateTargets) -> Option<Target> {
    let candidates = [
        (payload.pull_request.as_ref(), TargetKind::PullRequest),
        (payload.issue.as_ref(), TargetKind::Issue),
    ];
    candidates.into_iter().find_map(|(item, kind)| {
        let item = item?;
        if !targets.allows(kind) {
            return None;
        }
        Some(Target {
            number: item.number,
            kind,
            body: item.body.clone().unwrap_or_default(),
        })
    })
}

/// Everything known about the triggering event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    pub event_name: String,
    pub repo: Option<RepoRef>,
    pub actor: String,
    pub payload: EventPayload,
}

impl EventContext {
    /// Builds the context from runner variables. `event` replaces the payload
    /// file and may be a path or inline JSON.
    pub fn from_env(event: Option<&str>) -> Result<Self, TrackerError> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let (event_name, raw) = match event {
            Some(event) => {
                let raw = load_event(event)?;
                let name = raw
                    .get("eventName")
                    .or_else(|| raw.get("event_name"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                (name.or_else(|| env("GITHUB_EVENT_NAME")), unwrap_payload(raw))
            }
            None => {
                let raw = match env("GITHUB_EVENT_PATH") {
                    Some(path) => read_event_file(Path::new(&path))?,
                    None => serde_json::json!({}),
                };
                (env("GITHUB_EVENT_NAME"), raw)
            }
        };

        Self::from_parts(
            event_name.unwrap_or_default(),
            raw,
            env("GITHUB_REPOSITORY"),
            env("GITHUB_ACTOR"),
        )
    }

    /// Repository and actor prefer the runner variables and fall back to the
    /// payload's `repository` and `sender`.
    pub fn from_parts(
        event_name: String,
        raw: serde_json::Value,
        repository: Option<String>,
        actor: Option<String>,
    ) -> Result<Self, TrackerError> {
        let payload = EventPayload::from_value(raw)?;
        let repo = repository
            .as_deref()
            .and_then(RepoRef::parse)
            .or_else(|| payload.repository());
        let actor = actor
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .or_else(|| payload.sender.as_ref().map(|s| s.login.clone()))
            .unwrap_or_default();

        Ok(Self {
            event_name,
            repo,
            actor,
            payload,
        })
    }
}

fn load_event(event: &str) -> Result<serde_json::Value, TrackerError> {
    let path = Path::new(event);
    if path.exists() {
        return read_event_file(path);
    }
    serde_json::from_str(event)
        .map_err(|e| TrackerError::Event(format!("event is neither a file nor JSON: {e}")))
}

fn read_event_file(path: &Path) -> Result<serde_json::Value, TrackerError> {
    let text = fs::read_to_string(path).map_err(|e| {
        TrackerError::Event(format!("failed to read event file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        TrackerError::Event(format!("failed to parse event file {}: {e}", path.display()))
    })
}

/// Accepts both a bare webhook payload and a `{ "eventName", "payload" }`
/// wrapper as saved from an Actions context dump.
fn unwrap_payload(raw: serde_json::Value) -> serde_json::Value {
    match raw {
        serde_json::Value::Object(mut map) if map.get("payload").is_some_and(|p| p.is_object()) => {
            map.remove("payload").unwrap_or_default()
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codefence_config::UpdateTarget;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> EventPayload {
        EventPayload::from_value(value).unwrap()
    }

    #[test]
    fn test_select_pull_request() {
        let p = payload(json!({ "pull_request": { "number": 5, "body": "```\nx\n```" } }));
        let target = select_target(&p, &UpdateTargets::all()).unwrap();
        assert_eq!(target.number, 5);
        assert_eq!(target.kind, TargetKind::PullRequest);
        assert_eq!(target.body, "```\nx\n```");
    }

    #[test]
    fn test_select_issue_with_null_body() {
        let p = payload(json!({ "issue": { "number": 9, "body": null } }));
        let target = select_target(&p, &UpdateTargets::all()).unwrap();
        assert_eq!(target.kind, TargetKind::Issue);
        assert_eq!(target.body, "");
    }

    #[test]
    fn test_pull_request_filtered_out() {
        let p = payload(json!({ "pull_request": { "number": 5, "body": "b" } }));
        let issues_only: UpdateTargets = [UpdateTarget::Issue].into_iter().collect();
        assert_eq!(select_target(&p, &issues_only), None);
    }

    #[test]
    fn test_falls_back_to_issue_when_pull_requests_excluded() {
        let p = payload(json!({
            "pull_request": { "number": 1, "body": "pr" },
            "issue": { "number": 2, "body": "issue" }
        }));
        let issues_only: UpdateTargets = [UpdateTarget::Issue].into_iter().collect();
        let target = select_target(&p, &issues_only).unwrap();
        assert_eq!(target.number, 2);
        assert_eq!(target.kind, TargetKind::Issue);
    }

    #[test]
    fn test_nothing_to_select() {
        let p = payload(json!({ "ref": "refs/heads/main" }));
        assert_eq!(select_target(&p, &UpdateTargets::all()), None);
    }

    #[test]
    fn test_context_prefers_runner_variables() {
        let ctx = EventContext::from_parts(
            "issues".to_string(),
            json!({
                "issue": { "number": 1 },
                "repository": { "name": "payload-repo", "owner": { "login": "payload-owner" } },
                "sender": { "login": "payload-sender", "type": "User" }
            }),
            Some("env-owner/env-repo".to_string()),
            Some("env-actor".to_string()),
        )
        .unwrap();
        assert_eq!(ctx.repo, Some(RepoRef::new("env-owner", "env-repo")));
        assert_eq!(ctx.actor, "env-actor");
    }

    #[test]
    fn test_context_falls_back_to_payload() {
        let ctx = EventContext::from_parts(
            "issues".to_string(),
            json!({
                "issue": { "number": 1 },
                "repository": { "name": "hello", "owner": { "login": "octo" } },
                "sender": { "login": "octocat", "type": "User" }
            }),
            None,
            Some("   ".to_string()),
        )
        .unwrap();
        assert_eq!(ctx.repo, Some(RepoRef::new("octo", "hello")));
        assert_eq!(ctx.actor, "octocat");
    }

    #[test]
    fn test_full_name_wins_inside_payload() {
        let p = payload(json!({
            "repository": { "name": "x", "full_name": "octo/hello", "owner": { "login": "other" } }
        }));
        assert_eq!(p.repository(), Some(RepoRef::new("octo", "hello")));
    }

    #[test]
    fn test_bad_payload_shape() {
        let err = EventPayload::from_value(json!({ "issue": { "number": "one" } })).unwrap_err();
        assert!(matches!(err, TrackerError::Event(_)));
    }

    #[test]
    fn test_unwrap_payload() {
        let wrapped = json!({ "eventName": "issues", "payload": { "issue": { "number": 3 } } });
        assert_eq!(unwrap_payload(wrapped), json!({ "issue": { "number": 3 } }));

        let bare = json!({ "issue": { "number": 3 } });
        assert_eq!(unwrap_payload(bare.clone()), bare);
    }

    #[test]
    fn test_load_event_from_file_and_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{ "issue": { "number": 4 } }"#).unwrap();
        let from_file = load_event(path.to_str().unwrap()).unwrap();
        assert_eq!(from_file["issue"]["number"], 4);

        let inline = load_event(r#"{ "issue": { "number": 8 } }"#).unwrap();
        assert_eq!(inline["issue"]["number"], 8);

        assert!(load_event("not json and not a file").is_err());
    }
}
