use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Refresh superseded by a newer refresh")]
    RefreshSuperseded,
}

impl CalendarError {
    /// Whether the caller should expect the next refresh cycle to succeed.
    /// A superseded refresh already lost to a newer one, so retrying the
    /// old result makes no sense; fetch failures are transient.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, CalendarError::RefreshSuperseded)
    }
}
