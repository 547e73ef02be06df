//! Error types for the SiteStack core.

/// Core error type for SiteStack.
#[derive(Debug, thiserror::Error)]
pub enum SiteStackError {
    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// Invalid AWS region format.
    #[error("invalid AWS region: {0}")]
    InvalidRegion(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountId, AwsRegion};

    #[test]
    fn test_should_name_offending_value() {
        let err = AccountId::new("12345").validate().expect_err("short account");
        assert!(matches!(&err, SiteStackError::InvalidAccountId(raw) if raw == "12345"));
        assert_eq!(
            err.to_string(),
            "invalid AWS account ID: 12345 (must be 12-digit numeric string)"
        );

        let err = AwsRegion::new("useast1").validate().expect_err("bad region");
        assert_eq!(err.to_string(), "invalid AWS region: useast1");
    }
}
