pub mod actions;
pub mod logging;

pub use actions::{is_github_actions, set_failed, set_output};
pub use logging::{default_log_dir, init_tracing, LogLevel};
