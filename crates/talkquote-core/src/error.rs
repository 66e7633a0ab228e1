//! Error types for the quote bot.
//!
//! [`Error`] is the single error type returned by the adapters and the
//! session. Its `Display` output is the user-facing message; anything more
//! detailed is available through [`Error::diagnostic`] and only goes to the log.

/// User-facing message for every generation failure.
pub const GENERATION_FAILED: &str =
    "Could not generate quote. Please check your Gemini API key and configuration.";

/// Placeholder used when a failed Talk response carries no readable message.
pub const NO_DETAILS: &str = "No details provided.";

/// Error type for all quote bot operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing Gemini credential or unreadable settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The quote could not be produced. `detail` stays out of the message.
    #[error("{}", GENERATION_FAILED)]
    Generation { detail: String },

    /// Nextcloud answered with a non-success status.
    #[error("HTTP error! status: {status} - {detail}")]
    Post { status: u16, detail: String },

    /// The request to Nextcloud never got an HTTP response.
    #[error(
        "Network request failed. This might be a CORS or connectivity issue. Please ensure your \
         Nextcloud server is reachable and configured to accept requests from this client."
    )]
    Network(#[source] reqwest::Error),

    /// A local precondition failed before any network call.
    #[error("{0}")]
    Validation(String),

    /// A background request task died before returning a result.
    #[error("background task failed: {0}")]
    Task(String),
}

impl Error {
    pub(crate) fn generation(detail: impl Into<String>) -> Self {
        Error::Generation {
            detail: detail.into(),
        }
    }

    /// Text for the diagnostic log, including details hidden from the user.
    pub fn diagnostic(&self) -> String {
        match self {
            Error::Generation { detail } => format!("{self} ({detail})"),
            Error::Network(source) => format!("{self} ({source})"),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
