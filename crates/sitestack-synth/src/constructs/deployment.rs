//! Upload a staged asset into a bucket.
//!
//! The engine hands the custom resource to a Lambda handler that unpacks the
//! archive from the assets bucket and syncs it into the destination. The
//! resource names the bucket and its policy in `DependsOn`, so the upload
//! starts only after the bucket exists and is readable.

use std::path::PathBuf;

use sitestack_s3::{PolicyDocument, Statement};
use sitestack_template::{DeletionPolicy, Expr, Resource, Template, TemplateResult, logical_id, pseudo};
use tracing::debug;

use super::website_bucket::WebsiteBucket;
use super::{HandlerAssets, HandlerBundle, assets_bucket, bucket_and_objects, lambda_role};
use crate::asset::Asset;

/// Custom resource type of the deployment.
pub const DEPLOYMENT_TYPE: &str = "Custom::CDKBucketDeployment";

/// Construct ID of the stack-wide handler.
const HANDLER_ID: &str = "CustomCDKBucketDeploymentHandler";

/// Handler code of the deployment function.
pub const DEPLOYMENT_HANDLER: HandlerBundle = HandlerBundle {
    dir: "bucket-deployment",
    runtime: "python3.11",
    handler: "index.handler",
};

/// Bundle of the layer providing the AWS CLI to the handler.
pub const AWS_CLI_LAYER_DIR: &str = "awscli-layer";

/// Read access the handler needs on the source.
const READ_ACTIONS: [&str; 3] = ["s3:GetObject*", "s3:GetBucket*", "s3:List*"];

/// Additional access the handler needs on the destination.
const WRITE_ACTIONS: [&str; 7] = [
    "s3:DeleteObject*",
    "s3:PutObject",
    "s3:PutObjectLegalHold",
    "s3:PutObjectRetention",
    "s3:PutObjectTagging",
    "s3:PutObjectVersionTagging",
    "s3:Abort*",
];

/// Where an asset goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    /// Local directory the asset is staged from.
    pub source_dir: PathBuf,
    /// Key prefix in the destination bucket; empty means the bucket root.
    pub destination_prefix: String,
    /// Whether objects missing from the source are deleted from the destination.
    pub prune: bool,
}

impl DeploymentDescriptor {
    /// Mirror `source_dir` into the bucket root.
    #[must_use]
    pub fn to_root(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_prefix: String::new(),
            prune: true,
        }
    }
}

/// Logical IDs of the declared deployment resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDeployment {
    /// The `Custom::CDKBucketDeployment`.
    pub resource_id: String,
    /// The handler function.
    pub handler_id: String,
    /// The handler's IAM role.
    pub role_id: String,
    /// The handler's inline IAM policy.
    pub policy_id: String,
    /// The AWS CLI layer.
    pub layer_id: String,
}

impl BucketDeployment {
    /// Declare the deployment construct `id` into `template`.
    pub fn declare(
        template: &mut Template,
        id: &str,
        asset: &Asset,
        descriptor: &DeploymentDescriptor,
        bucket: &WebsiteBucket,
        handlers: &HandlerAssets,
    ) -> TemplateResult<Self> {
        let deployment = Self {
            resource_id: logical_id(&[id, "CustomResource", "Default"]),
            handler_id: logical_id(&[HANDLER_ID, "Resource"]),
            role_id: logical_id(&[HANDLER_ID, "ServiceRole", "Resource"]),
            policy_id: logical_id(&[HANDLER_ID, "ServiceRole", "DefaultPolicy", "Resource"]),
            layer_id: logical_id(&[id, "AwsCliLayer", "Resource"]),
        };

        template.add_resource(
            &deployment.layer_id,
            Resource::new("AWS::Lambda::LayerVersion")
                .property(
                    "Content",
                    Expr::map([
                        ("S3Bucket", assets_bucket()),
                        ("S3Key", Expr::str(handlers.awscli_layer.object_key())),
                    ]),
                )
                .property("Description", "/opt/awscli/aws"),
        )?;

        if template.resource(&deployment.handler_id).is_none() {
            deployment.declare_handler(template, bucket, &handlers.deployment)?;
        }

        let mut resource = Resource::new(DEPLOYMENT_TYPE)
            .property("ServiceToken", Expr::get_att(&deployment.handler_id, "Arn"))
            .property("SourceBucketNames", Expr::list([assets_bucket()]))
            .property("SourceObjectKeys", Expr::list([Expr::str(asset.object_key())]))
            .property("DestinationBucketName", Expr::reference(&bucket.bucket_id))
            .property(
                "DestinationBucketKeyPrefix",
                descriptor.destination_prefix.as_str(),
            )
            .property("Prune", descriptor.prune)
            .depends_on(&bucket.bucket_id)
            .removal_policy(DeletionPolicy::Delete);
        if let Some(policy_id) = &bucket.policy_id {
            resource = resource.depends_on(policy_id);
        }
        template.add_resource(&deployment.resource_id, resource)?;

        debug!(
            deployment = %deployment.resource_id,
            source = %descriptor.source_dir.display(),
            object_key = %asset.object_key(),
            "declared bucket deployment"
        );
        Ok(deployment)
    }

    fn declare_handler(
        &self,
        template: &mut Template,
        bucket: &WebsiteBucket,
        code: &Asset,
    ) -> TemplateResult<()> {
        template.add_resource(&self.role_id, lambda_role())?;

        let assets_arn = Expr::join(
            "",
            [
                Expr::str("arn:"),
                Expr::reference(pseudo::PARTITION),
                Expr::str(":s3:::"),
                assets_bucket(),
            ],
        );
        let document = PolicyDocument::new([
            Statement::allow(READ_ACTIONS).on(bucket_and_objects(assets_arn)),
            Statement::allow(READ_ACTIONS.into_iter().chain(WRITE_ACTIONS)).on(bucket.arns()),
        ]);
        template.add_resource(
            &self.policy_id,
            Resource::new("AWS::IAM::Policy")
                .property("PolicyDocument", &document)
                .property("PolicyName", self.policy_id.as_str())
                .property("Roles", Expr::list([Expr::reference(&self.role_id)])),
        )?;

        template.add_resource(
            &self.handler_id,
            Resource::new("AWS::Lambda::Function")
                .property("Code", DEPLOYMENT_HANDLER.code(code))
                .property("Role", Expr::get_att(&self.role_id, "Arn"))
                .property("Handler", DEPLOYMENT_HANDLER.handler)
                .property("Layers", Expr::list([Expr::reference(&self.layer_id)]))
                .property("Runtime", DEPLOYMENT_HANDLER.runtime)
                .property("Timeout", 900)
                .depends_on(&self.policy_id)
                .depends_on(&self.role_id),
        )
    }
}
