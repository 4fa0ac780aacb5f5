use thiserror::Error;

/// Typed error hierarchy for lensbot.
///
/// Used at module boundaries (media download, completion calls, config
/// loading). Internal/leaf functions can continue using `anyhow::Result` —
/// the `Internal` variant allows seamless conversion via the `?` operator.
#[derive(Debug, Error)]
pub enum LensbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image download failed: network fault or non-2xx status.
    #[error("Download error: {0}")]
    Download(String),

    /// Completion call failed: network fault or non-2xx status.
    #[error("Completion error: {0}")]
    Completion(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for results using `LensbotError`.
pub type LensbotResult<T> = std::result::Result<T, LensbotError>;
