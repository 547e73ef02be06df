//! S3 model error types.

/// Errors raised by S3 rule checks.
#[derive(Debug, thiserror::Error)]
pub enum S3ModelError {
    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },
}
