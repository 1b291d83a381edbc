use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use codefence_core::{is_tracking_comment, CommentAuthor};

use crate::TrackerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses `owner/name`, as found in `GITHUB_REPOSITORY`.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<CommentAuthor>,
}

impl IssueComment {
    pub fn is_tracking(&self, actor: &str) -> bool {
        is_tracking_comment(self.user.as_ref(), self.body.as_deref(), actor)
    }
}

/// The remote operations the sync needs from an issue tracker.
///
/// Calls are awaited one at a time; any error ends the run.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// One page of comments, oldest first. An empty page means the end.
    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<IssueComment>, TrackerError>;

    async fn update_body(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        is_pull_request: bool,
        body: &str,
    ) -> Result<(), TrackerError>;

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<IssueComment, TrackerError>;

    async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<(), TrackerError>;

    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> Result<(), TrackerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use codefence_core::TRACKING_MARKER;

    #[test]
    fn test_parse_repo() {
        assert_eq!(
            RepoRef::parse("octo-org/hello-world"),
            Some(RepoRef::new("octo-org", "hello-world"))
        );
        assert_eq!(RepoRef::parse("octo-org"), None);
        assert_eq!(RepoRef::parse("/repo"), None);
        assert_eq!(RepoRef::parse("owner/"), None);
        assert_eq!(RepoRef::parse("a/b/c"), None);
        assert_eq!(RepoRef::new("a", "b").to_string(), "a/b");
    }

    #[test]
    fn test_comment_deserializes_from_api_shape() {
        let comment: IssueComment = serde_json::from_value(serde_json::json!({
            "id": 42,
            "body": format!("{TRACKING_MARKER}\nhi"),
            "user": { "login": "github-actions[bot]", "type": "Bot", "id": 41898282 },
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(comment.id, 42);
        assert!(comment.is_tracking("someone"));
    }

    #[test]
    fn test_comment_with_null_fields() {
        let comment: IssueComment =
            serde_json::from_value(serde_json::json!({ "id": 7, "body": null, "user": null }))
                .unwrap();
        assert!(!comment.is_tracking("someone"));
    }
}
