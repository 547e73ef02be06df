//! Static website stack synthesis.
//!
//! [`SiteStack`] builds the CloudFormation template for a public S3 website
//! bucket whose contents are synced from a local directory, and
//! [`CloudAssembly`] writes it out in the layout the CDK toolkit deploys from.
//!
//! ```no_run
//! use sitestack_core::Environment;
//! use sitestack_synth::{CloudAssembly, SiteStack, SiteStackProps};
//!
//! let stack = SiteStack::new(
//!     SiteStackProps::builder()
//!         .env(Environment::new("123456789012", "us-east-1"))
//!         .build(),
//! )?;
//! CloudAssembly::write(&stack, "cdk.out")?;
//! # Ok::<(), sitestack_synth::SynthError>(())
//! ```

pub mod assembly;
pub mod asset;
pub mod constructs;
pub mod error;
pub mod stack;

#[cfg(test)]
mod fixtures;

pub use assembly::CloudAssembly;
pub use asset::{Asset, AssetFile};
pub use constructs::HandlerAssets;
pub use error::{SynthError, SynthResult};
pub use stack::{BUCKET_NAME_OUTPUT, SiteStack, SiteStackProps, WEBSITE_URL_OUTPUT};
