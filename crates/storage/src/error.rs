/// All errors that can be returned by a WatermarkStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or read. Callers must skip the
    /// invocation rather than treat this as first-run.
    #[error("watermark store unavailable: {0}")]
    Unavailable(String),

    /// The persisted record exists but cannot be decoded.
    #[error("corrupt watermark record: {0}")]
    Corrupt(String),

    /// A backend-specific error (filesystem, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
