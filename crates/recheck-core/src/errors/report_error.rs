//! Diagnostic report errors.

/// Errors that can occur while rendering or writing diagnostic reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization failed: {message}")]
    Serialization { message: String },
}
