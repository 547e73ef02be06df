//! Empty a bucket before the engine deletes it.
//!
//! The engine refuses to delete a non-empty bucket. A custom resource backed
//! by a small Lambda provider deletes every object when it is itself deleted;
//! since it depends on the bucket policy (and through it the bucket), the
//! engine tears it down first.

use sitestack_s3::{Principal, Statement};
use sitestack_template::{DeletionPolicy, Expr, Resource, Template, TemplateResult, logical_id};
use tracing::debug;

use super::{HandlerBundle, bucket_and_objects, lambda_role};
use crate::asset::Asset;

/// Custom resource type of the cleanup hook.
pub const AUTO_DELETE_TYPE: &str = "Custom::S3AutoDeleteObjects";

/// Tag the provider checks before deleting anything from a bucket.
pub const AUTO_DELETE_TAG: &str = "aws-cdk:auto-delete-objects";

/// Construct ID of the shared provider.
const PROVIDER_ID: &str = "Custom::S3AutoDeleteObjectsCustomResourceProvider";

/// Handler code of the provider.
pub const AUTO_DELETE_HANDLER: HandlerBundle = HandlerBundle {
    dir: "s3-auto-delete-objects",
    runtime: "nodejs20.x",
    handler: "index.handler",
};

/// Actions the provider needs on the bucket and its objects.
const PROVIDER_ACTIONS: [&str; 4] = [
    "s3:PutBucketPolicy",
    "s3:GetBucket*",
    "s3:List*",
    "s3:DeleteObject*",
];

/// The stack-wide Lambda provider that services every auto-delete resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoDeleteProvider {
    /// Logical ID of the provider's IAM role.
    pub role_id: String,
    /// Logical ID of the provider's function.
    pub handler_id: String,
}

impl AutoDeleteProvider {
    /// Declare the provider running `code`, or return the existing one.
    pub fn declare(template: &mut Template, code: &Asset) -> TemplateResult<Self> {
        let provider = Self {
            role_id: logical_id(&[PROVIDER_ID, "Role"]),
            handler_id: logical_id(&[PROVIDER_ID, "Handler"]),
        };
        if template.resource(&provider.handler_id).is_some() {
            return Ok(provider);
        }

        template.add_resource(&provider.role_id, lambda_role())?;
        template.add_resource(
            &provider.handler_id,
            Resource::new("AWS::Lambda::Function")
                .property("Code", AUTO_DELETE_HANDLER.code(code))
                .property("Timeout", 900)
                .property("MemorySize", 128)
                .property("Handler", AUTO_DELETE_HANDLER.handler)
                .property("Role", Expr::get_att(&provider.role_id, "Arn"))
                .property("Runtime", AUTO_DELETE_HANDLER.runtime)
                .property(
                    "Description",
                    "Lambda function for auto-deleting objects in the website bucket.",
                )
                .depends_on(&provider.role_id),
        )?;
        debug!(
            handler = %provider.handler_id,
            object_key = %code.object_key(),
            "declared auto-delete provider"
        );
        Ok(provider)
    }

    /// Bucket-policy statement letting the provider empty the bucket.
    #[must_use]
    pub fn grant(&self, bucket_arn: Expr) -> Statement {
        Statement::allow(PROVIDER_ACTIONS)
            .principal(Principal::Aws(Expr::get_att(&self.role_id, "Arn")))
            .on(bucket_and_objects(bucket_arn))
    }

    /// The cleanup resource for one bucket.
    ///
    /// It depends on the bucket policy so that the provider's permissions
    /// outlive it during teardown.
    #[must_use]
    pub fn custom_resource(&self, bucket_id: &str, policy_id: &str) -> Resource {
        Resource::new(AUTO_DELETE_TYPE)
            .property("ServiceToken", Expr::get_att(&self.handler_id, "Arn"))
            .property("BucketName", Expr::reference(bucket_id))
            .depends_on(policy_id)
            .removal_policy(DeletionPolicy::Delete)
    }
}
