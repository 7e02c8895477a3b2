use thiserror::Error;

/// Client failures that callers need to tell apart.
///
/// These are raised as [`eyre::Report`]s; recover the variant with
/// `report.downcast_ref::<ClientError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The format tag is not one of `json`, `yaml` or `yml`
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The server answered with a status code of 400 or above
    #[error("HTTP Status code {0}")]
    HttpStatus(u16),
}
