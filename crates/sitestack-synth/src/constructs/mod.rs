//! Resource groups that make up the site stack.
//!
//! Each construct declares its resources into a [`Template`] under logical
//! IDs derived from its construct path, and returns the IDs other constructs
//! need to reference.
//!
//! [`Template`]: sitestack_template::Template

pub mod auto_delete;
pub mod bootstrap;
pub mod deployment;
pub mod website_bucket;

use std::path::Path;

use sitestack_s3::PolicyDocument;
use sitestack_template::{Expr, Resource};

use crate::asset::Asset;
use crate::error::{SynthError, SynthResult};

/// Bootstrap qualifier shared with the assets bucket and version parameter.
pub const BOOTSTRAP_QUALIFIER: &str = "hnb659fds";

/// Name of the bootstrap assets bucket, resolved by the engine.
#[must_use]
pub fn assets_bucket() -> Expr {
    Expr::sub(format!(
        "cdk-{BOOTSTRAP_QUALIFIER}-assets-${{AWS::AccountId}}-${{AWS::Region}}"
    ))
}

/// Prebuilt Lambda handler code, shipped as a file asset from a
/// subdirectory of the handler directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerBundle {
    /// Subdirectory holding the handler code.
    pub dir: &'static str,
    /// Lambda runtime identifier.
    pub runtime: &'static str,
    /// Entry point.
    pub handler: &'static str,
}

impl HandlerBundle {
    /// `Code` property pointing at the published bundle.
    #[must_use]
    pub fn code(&self, asset: &Asset) -> Expr {
        Expr::map([
            ("S3Bucket", assets_bucket()),
            ("S3Key", Expr::str(asset.object_key())),
        ])
    }
}

/// The handler and layer bundles the constructs deploy, staged as assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerAssets {
    /// Code of the auto-delete provider.
    pub auto_delete: Asset,
    /// Code of the bucket deployment handler.
    pub deployment: Asset,
    /// Content of the AWS CLI layer.
    pub awscli_layer: Asset,
}

impl HandlerAssets {
    /// Stage every bundle from its subdirectory of `dir`.
    ///
    /// # Errors
    /// Returns [`SynthError::HandlerBundleMissing`] if a bundle directory is
    /// missing or empty, or [`SynthError::Io`] if a file cannot be read.
    pub fn stage(dir: impl AsRef<Path>) -> SynthResult<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            auto_delete: stage_bundle(dir, auto_delete::AUTO_DELETE_HANDLER.dir)?,
            deployment: stage_bundle(dir, deployment::DEPLOYMENT_HANDLER.dir)?,
            awscli_layer: stage_bundle(dir, deployment::AWS_CLI_LAYER_DIR)?,
        })
    }

    /// All bundles.
    pub fn iter(&self) -> std::array::IntoIter<&Asset, 3> {
        self.into_iter()
    }
}

impl<'a> IntoIterator for &'a HandlerAssets {
    type Item = &'a Asset;
    type IntoIter = std::array::IntoIter<&'a Asset, 3>;

    fn into_iter(self) -> Self::IntoIter {
        [&self.auto_delete, &self.deployment, &self.awscli_layer].into_iter()
    }
}

fn stage_bundle(dir: &Path, name: &'static str) -> SynthResult<Asset> {
    let path = dir.join(name);
    if !path.is_dir() {
        return Err(SynthError::HandlerBundleMissing { name, path });
    }
    let asset = Asset::stage(&path)?;
    if asset.files().is_empty() {
        return Err(SynthError::HandlerBundleMissing { name, path });
    }
    Ok(asset)
}

/// Managed policy granting a Lambda function permission to write logs.
#[must_use]
pub fn lambda_basic_execution_policy() -> Expr {
    Expr::sub(
        "arn:${AWS::Partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole",
    )
}

/// An IAM role assumable by Lambda with basic execution permissions.
#[must_use]
pub fn lambda_role() -> Resource {
    Resource::new("AWS::IAM::Role")
        .property(
            "AssumeRolePolicyDocument",
            &PolicyDocument::assume_role("lambda.amazonaws.com"),
        )
        .property(
            "ManagedPolicyArns",
            Expr::list([lambda_basic_execution_policy()]),
        )
}

/// `arn` and `arn/*` for a bucket ARN expression.
#[must_use]
pub fn bucket_and_objects(arn: Expr) -> [Expr; 2] {
    let objects = Expr::join("", [arn.clone(), Expr::str("/*")]);
    [arn, objects]
}
