//! GitHub side of codefence: the issue tracker capability, its REST
//! implementation, event context parsing and the body/comment sync.

pub mod client;
pub mod error;
pub mod event;
pub mod sync;
pub mod tracker;

pub use client::GithubClient;
pub use error::TrackerError;
pub use event::{select_target, EventContext, EventItem, EventPayload, Target};
pub use sync::{
    find_tracking_comment, sync_code_blocks, CommentAction, SyncAction, SyncOutcome,
    COMMENTS_PAGE_SIZE,
};
pub use tracker::{IssueComment, IssueTracker, RepoRef};
