//! The website bucket, its access policy, and its teardown cleanup.

use sitestack_s3::{
    BUCKET_POLICY_TYPE, BucketProperties, PolicyDocument, Principal,
    PublicAccessBlockConfiguration, Statement, Tag, WebsiteConfiguration,
};
use sitestack_template::{DeletionPolicy, Expr, Resource, Template, TemplateResult, logical_id};
use tracing::debug;

use super::auto_delete::{AUTO_DELETE_TAG, AutoDeleteProvider};
use super::{HandlerAssets, bucket_and_objects};

/// What the website bucket looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketDescriptor {
    /// Bucket name; literal for a pinned environment, deploy-time otherwise.
    pub name: Expr,
    /// Object served for directory requests.
    pub index_document: String,
    /// Object served on errors.
    pub error_document: String,
    /// Whether anyone may read objects.
    pub public_read: bool,
    /// Whether the bucket and its contents are destroyed with the stack.
    pub destroy_on_teardown: bool,
}

impl BucketDescriptor {
    /// The descriptor used by the site stack: `index.html` / `error.html`,
    /// public, destroyed on teardown.
    #[must_use]
    pub fn website(name: Expr) -> Self {
        Self {
            name,
            index_document: "index.html".to_owned(),
            error_document: "error.html".to_owned(),
            public_read: true,
            destroy_on_teardown: true,
        }
    }
}

/// Logical IDs of the declared bucket resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteBucket {
    /// The `AWS::S3::Bucket`.
    pub bucket_id: String,
    /// The `AWS::S3::BucketPolicy`, if any statement was needed.
    pub policy_id: Option<String>,
    /// The auto-delete custom resource, if the bucket is destroyed on teardown.
    pub auto_delete_id: Option<String>,
}

impl WebsiteBucket {
    /// Declare the bucket construct `id` into `template`.
    pub fn declare(
        template: &mut Template,
        id: &str,
        descriptor: &BucketDescriptor,
        handlers: &HandlerAssets,
    ) -> TemplateResult<Self> {
        let bucket_id = logical_id(&[id, "Resource"]);
        let bucket_arn = Expr::get_att(&bucket_id, "Arn");

        let public_access_block = if descriptor.public_read {
            PublicAccessBlockConfiguration::allow_all()
        } else {
            PublicAccessBlockConfiguration::block_all()
        };
        let mut tags = Vec::new();
        if descriptor.destroy_on_teardown {
            tags.push(Tag::new(AUTO_DELETE_TAG, "true"));
        }
        let props = BucketProperties {
            bucket_name: Some(descriptor.name.clone()),
            website: Some(WebsiteConfiguration::new(
                &descriptor.index_document,
                &descriptor.error_document,
            )),
            public_access_block: Some(public_access_block),
            tags,
        };
        let removal = if descriptor.destroy_on_teardown {
            DeletionPolicy::Delete
        } else {
            DeletionPolicy::Retain
        };
        template.add_resource(&bucket_id, props.to_resource().removal_policy(removal))?;

        let provider = if descriptor.destroy_on_teardown {
            Some(AutoDeleteProvider::declare(template, &handlers.auto_delete)?)
        } else {
            None
        };

        let mut statements = Vec::new();
        if descriptor.public_read {
            statements.push(
                Statement::allow(["s3:GetObject"])
                    .principal(Principal::Anyone)
                    .on([Expr::join("", [bucket_arn.clone(), Expr::str("/*")])]),
            );
        }
        if let Some(provider) = &provider {
            statements.push(provider.grant(bucket_arn));
        }

        let policy_id = if statements.is_empty() {
            None
        } else {
            let policy_id = logical_id(&[id, "Policy", "Resource"]);
            template.add_resource(
                &policy_id,
                Resource::new(BUCKET_POLICY_TYPE)
                    .property("Bucket", Expr::reference(&bucket_id))
                    .property("PolicyDocument", &PolicyDocument::new(statements)),
            )?;
            Some(policy_id)
        };

        let auto_delete_id = match (&provider, &policy_id) {
            (Some(provider), Some(policy_id)) => {
                let auto_delete_id = logical_id(&[id, "AutoDeleteObjectsCustomResource", "Default"]);
                template.add_resource(
                    &auto_delete_id,
                    provider.custom_resource(&bucket_id, policy_id),
                )?;
                Some(auto_delete_id)
            }
            _ => None,
        };

        debug!(
            bucket = %bucket_id,
            public_read = descriptor.public_read,
            destroy_on_teardown = descriptor.destroy_on_teardown,
            "declared website bucket"
        );
        Ok(Self {
            bucket_id,
            policy_id,
            auto_delete_id,
        })
    }

    /// `arn` and `arn/*` of the bucket.
    #[must_use]
    pub fn arns(&self) -> [Expr; 2] {
        bucket_and_objects(Expr::get_att(&self.bucket_id, "Arn"))
    }
}
