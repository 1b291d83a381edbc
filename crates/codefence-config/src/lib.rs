pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::{env_lookup, input_env_name, ConfigLoader};
pub use schema::{ActionConfig, Config, UpdateTarget, UpdateTargets, DEFAULT_API_URL};
