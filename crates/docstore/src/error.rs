use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no connection configured with name '{0}'")]
    UnknownConnection(String),

    #[error("'{operation}' did not complete within {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Raised by the driver and passed through as is.
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
