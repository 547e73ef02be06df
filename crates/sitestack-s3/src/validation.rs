//! S3 bucket naming rules.
//!
//! Follows the rules in the
//! [Amazon S3 documentation](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html).
//! Synthesis never rejects a name on these grounds; the engine has the final
//! word, so callers only report violations.

use std::net::Ipv4Addr;

use crate::error::S3ModelError;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Suffix appended to `{account}-{region}` to name the website bucket.
pub const WEBSITE_BUCKET_SUFFIX: &str = "static-website";

/// Validate an S3 bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
/// - Must not start with `xn--` or `sthree-`
/// - Must not end with `-s3alias` or `--ol-s3`
///
/// # Errors
///
/// Returns [`S3ModelError::InvalidBucketName`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use sitestack_s3::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("123456789012-us-east-1-static-website").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), S3ModelError> {
    let invalid = |reason: &str| S3ModelError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    let len = name.len();

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(invalid(&format!(
            "Bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "Bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit())
        || !(last.is_ascii_lowercase() || last.is_ascii_digit())
    {
        return Err(invalid("Bucket name must start and end with a letter or number"));
    }

    if name.contains("..") {
        return Err(invalid("Bucket name must not contain consecutive dots"));
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid("Bucket name must not be formatted as an IP address"));
    }

    for prefix in ["xn--", "sthree-"] {
        if name.starts_with(prefix) {
            return Err(invalid(&format!("Bucket name must not start with '{prefix}'")));
        }
    }

    for suffix in ["-s3alias", "--ol-s3"] {
        if name.ends_with(suffix) {
            return Err(invalid(&format!("Bucket name must not end with '{suffix}'")));
        }
    }

    Ok(())
}

/// The website bucket name for a concrete account and region.
///
/// # Examples
///
/// ```
/// use sitestack_s3::validation::website_bucket_name;
///
/// assert_eq!(
///     website_bucket_name("987654321098", "eu-west-1"),
///     "987654321098-eu-west-1-static-website"
/// );
/// ```
#[must_use]
pub fn website_bucket_name(account: &str, region: &str) -> String {
    format!("{account}-{region}-{WEBSITE_BUCKET_SUFFIX}")
}
