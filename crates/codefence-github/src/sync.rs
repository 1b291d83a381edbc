use tracing::{debug, info, warn};

use codefence_config::ActionConfig;
use codefence_core::{
    find_missing_lang_blocks, fix_code_blocks, render_tracking_comment, Finding, TargetKind,
};

use crate::{select_target, EventContext, IssueComment, IssueTracker, RepoRef, TrackerError};

/// Comments fetched per request while looking for the tracking comment.
pub const COMMENTS_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Created,
    Updated,
    Unchanged,
    /// `silent` is set; comments were neither searched nor written.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// The event is not one the configuration asks to process.
    Skipped,
    /// The body was rewritten.
    Fixed { comment: CommentAction },
    /// No bare fences left and the stale tracking comment was removed.
    CommentDeleted,
    AllClear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncAction,
    pub fixes: usize,
    pub findings: Vec<Finding>,
}

impl SyncOutcome {
    fn new(action: SyncAction, fixes: usize, findings: Vec<Finding>) -> Self {
        Self {
            action,
            fixes,
            findings,
        }
    }
}

/// Pages through the comments of an issue until the tracking comment turns
/// up, an empty or short page is returned, or the tracker fails.
pub async fn find_tracking_comment<T>(
    tracker: &T,
    repo: &RepoRef,
    issue_number: u64,
    actor: &str,
) -> Result<Option<IssueComment>, TrackerError>
where
    T: IssueTracker + ?Sized,
{
    let mut page = 1;
    loop {
        let comments = tracker
            .list_comments(repo, issue_number, page, COMMENTS_PAGE_SIZE)
            .await?;
        debug!(page, count = comments.len(), "fetched comment page");
        let count = comments.len();
        if let Some(found) = comments.into_iter().find(|c| c.is_tracking(actor)) {
            return Ok(Some(found));
        }
        if count < COMMENTS_PAGE_SIZE as usize {
            return Ok(None);
        }
        page += 1;
    }
}

/// One run: rewrite bare fences in the event's issue or pull request body and
/// keep the tracking comment in step with it.
///
/// The body write and the comment write are separate calls. If the second one
/// fails the body stays rewritten and the error is returned.
pub async fn sync_code_blocks<T>(
    tracker: &T,
    config: &ActionConfig,
    context: &EventContext,
) -> Result<SyncOutcome, TrackerError>
where
    T: IssueTracker + ?Sized,
{
    let Some(target) = select_target(&context.payload, &config.what_to_update) else {
        info!("Event type does not match what-to-update input. Skipping.");
        return Ok(SyncOutcome::new(SyncAction::Skipped, 0, Vec::new()));
    };
    let repo = context.repo.as_ref().ok_or_else(|| {
        TrackerError::Event("could not resolve the repository owner and name".to_string())
    })?;

    info!(
        repo = %repo,
        number = target.number,
        kind = %target.kind,
        event = %context.event_name,
        "checking code blocks"
    );

    let findings = find_missing_lang_blocks(&target.body);
    for finding in &findings {
        debug!("{}", finding);
    }

    if !findings.is_empty() {
        let fix = fix_code_blocks(&target.body, &config.language);
        if fix.fixed && fix.body != target.body {
            let existing = if config.silent {
                None
            } else {
                find_tracking_comment(tracker, repo, target.number, &context.actor).await?
            };

            tracker
                .update_body(
                    repo,
                    target.number,
                    target.kind == TargetKind::PullRequest,
                    &fix.body,
                )
                .await?;

            let comment = if config.silent {
                CommentAction::Suppressed
            } else {
                let body = render_tracking_comment(target.kind, &config.language);
                upsert_tracking_comment(tracker, repo, target.number, existing, &body).await?
            };

            if comment == CommentAction::Suppressed {
                info!("Fixed {} missing code block language(s).", fix.fix_count);
            } else {
                info!(
                    "Fixed {} missing code block language(s) and notified the user.",
                    fix.fix_count
                );
            }
            return Ok(SyncOutcome::new(
                SyncAction::Fixed { comment },
                fix.fix_count,
                findings,
            ));
        }

        warn!(
            count = findings.len(),
            "found code blocks without a language that could not be rewritten"
        );
        info!("All code blocks have language specified.");
        return Ok(SyncOutcome::new(SyncAction::AllClear, 0, findings));
    }

    if !config.silent {
        if let Some(stale) =
            find_tracking_comment(tracker, repo, target.number, &context.actor).await?
        {
            tracker.delete_comment(repo, stale.id).await?;
            info!("All code blocks have language specified. Thank you.");
            return Ok(SyncOutcome::new(SyncAction::CommentDeleted, 0, findings));
        }
    }

    info!("All code blocks have language specified.");
    Ok(SyncOutcome::new(SyncAction::AllClear, 0, findings))
}

async fn upsert_tracking_comment<T>(
    tracker: &T,
    repo: &RepoRef,
    issue_number: u64,
    existing: Option<IssueComment>,
    body: &str,
) -> Result<CommentAction, TrackerError>
where
    T: IssueTracker + ?Sized,
{
    match existing {
        Some(comment) if comment.body.as_deref() == Some(body) => Ok(CommentAction::Unchanged),
        Some(comment) => {
            tracker.update_comment(repo, comment.id, body).await?;
            Ok(CommentAction::Updated)
        }
        None => {
            let created = tracker.create_comment(repo, issue_number, body).await?;
            debug!(comment_id = created.id, "created tracking comment");
            Ok(CommentAction::Created)
        }
    }
}
