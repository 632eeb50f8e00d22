//! Error type shared by the table, its cursor protocol and the capability layer.

use thiserror::Error;

/// Recoverable failures reported by table operations.
///
/// A missing key is never an error: lookups report absence through `Option`
/// or `bool`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A table was requested with zero buckets.
    #[error("bucket count must be positive")]
    ZeroBuckets,

    /// The bucket array could not be allocated.
    #[error("failed to allocate a bucket array of {buckets} buckets")]
    AllocationFailed {
        /// Requested bucket count
        buckets: usize,
    },

    /// A `TableConfig` field is out of range.
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),

    /// A cursor was used after the table was structurally mutated.
    #[error("cursor invalidated by a structural mutation of the table")]
    StaleCursor,

    /// The operation exists in the capability set but this implementation
    /// does not provide it.
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),
}
