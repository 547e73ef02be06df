//! Common AWS type definitions shared across crates.

use std::fmt;

use crate::error::SiteStackError;

/// AWS Account ID (normally a 12-digit string).
///
/// Construction never fails: the provisioning engine is the authority on
/// whether an account exists, so a malformed value is carried through and can
/// be checked with [`AccountId::validate`] for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Check that the account ID is a 12-digit numeric string.
    ///
    /// # Errors
    /// Returns [`SiteStackError::InvalidAccountId`] if the format is wrong.
    pub fn validate(&self) -> Result<(), SiteStackError> {
        if self.0.len() != 12 || !self.0.chars().all(|c| c.is_ascii_digit()) {
            return Err(SiteStackError::InvalidAccountId(self.0.clone()));
        }
        Ok(())
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Check that the region looks like `xx-name-N` (e.g. `us-east-1`).
    ///
    /// # Errors
    /// Returns [`SiteStackError::InvalidRegion`] if the format is wrong.
    pub fn validate(&self) -> Result<(), SiteStackError> {
        let mut parts = self.0.split('-').collect::<Vec<_>>();
        let valid = parts.len() >= 3
            && parts
                .pop()
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_lowercase()));
        if valid {
            Ok(())
        } else {
            Err(SiteStackError::InvalidRegion(self.0.clone()))
        }
    }

    /// The AWS partition this region belongs to.
    #[must_use]
    pub fn partition(&self) -> &'static str {
        if self.0.starts_with("cn-") {
            "aws-cn"
        } else if self.0.starts_with("us-gov-") {
            "aws-us-gov"
        } else {
            "aws"
        }
    }

    /// The DNS suffix for service endpoints in this region's partition.
    #[must_use]
    pub fn url_suffix(&self) -> &'static str {
        if self.0.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        }
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target environment of a stack.
///
/// Either half may be absent; the template then refers to the
/// `AWS::AccountId` / `AWS::Region` pseudo parameters, which the engine
/// resolves at deploy time.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Environment {
    /// Target account, if pinned.
    pub account: Option<AccountId>,
    /// Target region, if pinned.
    pub region: Option<AwsRegion>,
}

impl Environment {
    /// Placeholder used in environment URIs when the account is not pinned.
    pub const UNKNOWN_ACCOUNT: &str = "unknown-account";

    /// Placeholder used in environment URIs when the region is not pinned.
    pub const UNKNOWN_REGION: &str = "unknown-region";

    /// Create an environment pinned to both an account and a region.
    #[must_use]
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: Some(AccountId::new(account)),
            region: Some(AwsRegion::new(region)),
        }
    }

    /// An environment with neither account nor region pinned.
    #[must_use]
    pub fn agnostic() -> Self {
        Self::default()
    }

    /// Whether both account and region are known at synthesis time.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.account.is_some() && self.region.is_some()
    }

    /// Render as an `aws://{account}/{region}` environment URI.
    #[must_use]
    pub fn uri(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account
                .as_ref()
                .map_or(Self::UNKNOWN_ACCOUNT, AccountId::as_str),
            self.region
                .as_ref()
                .map_or(Self::UNKNOWN_REGION, AwsRegion::as_str),
        )
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
