#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("GitHub API {operation} failed with status {status}: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("GitHub API {operation} request failed: {message}")]
    Network {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to decode GitHub {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to build GitHub client: {0}")]
    Client(String),

    #[error("Invalid event context: {0}")]
    Event(String),
}
