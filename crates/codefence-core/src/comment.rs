use serde::{Deserialize, Serialize};

/// Hidden marker that identifies the tracking comment among all comments.
pub const TRACKING_MARKER: &str = "<!-- markdown-code-block-checker -->";

/// Author type reported by GitHub for app and bot accounts.
pub const BOT_USER_TYPE: &str = "Bot";

/// Login used by the default Actions token.
pub const ACTIONS_BOT_LOGIN: &str = "github-actions[bot]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    #[serde(default)]
    pub login: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl CommentAuthor {
    pub fn is_automation(&self, actor: &str) -> bool {
        self.user_type.as_deref() == Some(BOT_USER_TYPE)
            || self.login == ACTIONS_BOT_LOGIN
            || (!actor.is_empty() && self.login == actor)
    }
}

/// Whether a comment is the one this tool maintains: written by an
/// automation account (or the running actor) and carrying [`TRACKING_MARKER`].
pub fn is_tracking_comment(author: Option<&CommentAuthor>, body: Option<&str>, actor: &str) -> bool {
    let Some(author) = author else {
        return false;
    };
    author.is_automation(actor) && body.is_some_and(|b| b.contains(TRACKING_MARKER))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Issue,
    PullRequest,
}

impl TargetKind {
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Issue => "issue",
            TargetKind::PullRequest => "pull request",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of the tracking comment posted after bare fences were rewritten.
pub fn render_tracking_comment(kind: TargetKind, lang: &str) -> String {
    [
        TRACKING_MARKER.to_string(),
        format!(
            ":information_source: All code blocks without a language in this {} description were set to `{}` by default.",
            kind.label(),
            lang
        ),
        String::new(),
        "**You must check if the language was guessed correctly.**".to_string(),
        String::new(),
        "> In the future, please specify the language after the opening triple backticks in your code snippets.".to_string(),
        String::new(),
        "Example:".to_string(),
        "````markdown".to_string(),
        "```python".to_string(),
        "print(\"hello world\")".to_string(),
        "```".to_string(),
        "````".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(login: &str, user_type: Option<&str>) -> CommentAuthor {
        CommentAuthor {
            login: login.to_string(),
            user_type: user_type.map(str::to_string),
        }
    }

    #[test]
    fn test_bot_type_with_marker() {
        let a = author("some-app[bot]", Some("Bot"));
        assert!(is_tracking_comment(Some(&a), Some(TRACKING_MARKER), "octocat"));
    }

    #[test]
    fn test_actions_login_with_marker() {
        let a = author(ACTIONS_BOT_LOGIN, None);
        let body = format!("{TRACKING_MARKER}\nhello");
        assert!(is_tracking_comment(Some(&a), Some(&body), "octocat"));
    }

    #[test]
    fn test_current_actor_with_marker() {
        let a = author("octocat", Some("User"));
        assert!(is_tracking_comment(Some(&a), Some(TRACKING_MARKER), "octocat"));
    }

    #[test]
    fn test_human_with_marker_is_rejected() {
        let a = author("someone-else", Some("User"));
        assert!(!is_tracking_comment(Some(&a), Some(TRACKING_MARKER), "octocat"));
    }

    #[test]
    fn test_bot_without_marker_is_rejected() {
        let a = author(ACTIONS_BOT_LOGIN, Some("Bot"));
        assert!(!is_tracking_comment(Some(&a), Some("looks good"), "octocat"));
        assert!(!is_tracking_comment(Some(&a), None, "octocat"));
    }

    #[test]
    fn test_missing_author_is_rejected() {
        assert!(!is_tracking_comment(None, Some(TRACKING_MARKER), "octocat"));
    }

    #[test]
    fn test_empty_actor_does_not_match_empty_login() {
        let a = author("", None);
        assert!(!is_tracking_comment(Some(&a), Some(TRACKING_MARKER), ""));
    }

    #[test]
    fn test_rendered_comment() {
        let body = render_tracking_comment(TargetKind::PullRequest, "python");
        assert!(body.starts_with(TRACKING_MARKER));
        assert!(body.contains("in this pull request description were set to `python` by default."));
        assert!(body.ends_with("````"));

        let issue = render_tracking_comment(TargetKind::Issue, "rust");
        assert!(issue.contains("in this issue description were set to `rust`"));
    }
}
