//! Configuration management for SiteStack.
//!
//! All configuration is driven by environment variables, following the
//! conventions of the CDK toolkit that invokes synthesizers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::{AccountId, AwsRegion, Environment};

/// Synthesis configuration.
///
/// # Examples
///
/// ```
/// use sitestack_core::SiteConfig;
///
/// let config = SiteConfig::default();
/// assert_eq!(config.stack_name, "S3StaticWebappStack");
/// assert_eq!(config.asset_dir.to_str(), Some("./web"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Target account (`CDK_DEFAULT_ACCOUNT`).
    #[builder(default, setter(strip_option, into))]
    pub account: Option<String>,

    /// Target region (`CDK_DEFAULT_REGION`).
    #[builder(default, setter(strip_option, into))]
    pub region: Option<String>,

    /// Name of the synthesized stack.
    #[builder(default = String::from("S3StaticWebappStack"), setter(into))]
    pub stack_name: String,

    /// Directory of website assets to deploy.
    #[builder(default = PathBuf::from("./web"), setter(into))]
    pub asset_dir: PathBuf,

    /// Directory of prebuilt Lambda handler and layer bundles.
    #[builder(default = PathBuf::from("./handlers"), setter(into))]
    pub handler_dir: PathBuf,

    /// Cloud assembly output directory.
    #[builder(default = PathBuf::from("cdk.out"), setter(into))]
    pub out_dir: PathBuf,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"), setter(into))]
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CDK_DEFAULT_ACCOUNT` | *(unset)* |
    /// | `CDK_DEFAULT_REGION` | *(unset)* |
    /// | `SITE_STACK_NAME` | `S3StaticWebappStack` |
    /// | `SITE_ASSET_DIR` | `./web` |
    /// | `SITE_HANDLER_DIR` | `./handlers` |
    /// | `CDK_OUTDIR` | `cdk.out` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            account: get("CDK_DEFAULT_ACCOUNT"),
            region: get("CDK_DEFAULT_REGION"),
            stack_name: get("SITE_STACK_NAME").unwrap_or(defaults.stack_name),
            asset_dir: get("SITE_ASSET_DIR").map_or(defaults.asset_dir, PathBuf::from),
            handler_dir: get("SITE_HANDLER_DIR").map_or(defaults.handler_dir, PathBuf::from),
            out_dir: get("CDK_OUTDIR").map_or(defaults.out_dir, PathBuf::from),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// The stack environment described by this configuration.
    #[must_use]
    pub fn environment(&self) -> Environment {
        Environment {
            account: self.account.clone().map(AccountId::new),
            region: self.region.clone().map(AwsRegion::new),
        }
    }
}
