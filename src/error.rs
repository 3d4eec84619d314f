use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the fetch-and-flatten pipeline.
///
/// `Config` and `Schema` are programmer errors: they fail immediately and are
/// never retried. `Transport` and `Payload` occur inside individual fetch
/// units and are reported per unit by the concurrent fetcher rather than
/// silently dropped.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter, e.g. a zero chunk size or worker count.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Network, auth, or HTTP-level failure.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response document violates the expected shape (e.g. no
    /// `response` field, or a record that is not a JSON object).
    #[error("unexpected payload: {0}")]
    Payload(String),

    /// Decomposition invoked with carry columns outside the table's
    /// column set, or on a column that does not hold a list.
    #[error("schema violation: {0}")]
    Schema(String),
}

impl Error {
    /// Wrap any transport-layer error without tying the core to a
    /// particular HTTP client.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(err.into())
    }
}
