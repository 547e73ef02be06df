//! Core types, configuration, and errors for SiteStack.
//!
//! This crate provides the building blocks shared by the template model and
//! the stack synthesizer: the deployment [`Environment`] (an optional account
//! and region), the env-driven [`SiteConfig`], and the common error type.

mod config;
mod error;
mod types;

pub use config::SiteConfig;
pub use error::SiteStackError;
pub use types::{AccountId, AwsRegion, Environment};
