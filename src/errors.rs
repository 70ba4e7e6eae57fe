/// Errors raised while building a command through the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command {name} takes {min}..={max} arguments, got {got}")]
    ArityMismatch {
        name: &'static str,
        min: usize,
        max: usize,
        got: usize,
    },
}

/// Errors raised while carrying the queue across a redirect.
#[derive(Debug, thiserror::Error)]
pub enum PreserveError {
    #[error("Session storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Cannot encode preserved commands: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid redirect response: {0}")]
    Redirect(#[from] http::Error),
}

/// Errors raised while loading or validating the render configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tracking ID must not be blank")]
    BlankTrackingId,

    #[error("Default command list must not be empty")]
    EmptyDefaults,

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}
