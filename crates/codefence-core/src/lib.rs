//! Fenced code block scanning and rewriting for issue and pull request bodies.
//!
//! Everything in this crate is a pure function over text. Talking to the
//! issue tracker lives in `codefence-github`.

pub mod comment;
pub mod fixer;
pub mod scanner;

pub use comment::{
    is_tracking_comment, render_tracking_comment, CommentAuthor, TargetKind, ACTIONS_BOT_LOGIN,
    BOT_USER_TYPE, TRACKING_MARKER,
};
pub use fixer::{fix_code_blocks, FixResult};
pub use scanner::{find_missing_lang_blocks, Finding, MAX_PREVIEW_CHARS};

/// Three backticks opening or closing a fenced block.
pub const FENCE: &str = "```";
