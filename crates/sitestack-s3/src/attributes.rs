//! Deploy-time attributes of S3 resources.

use sitestack_template::{AttributeResolver, DeployContext, Resource, TemplateResult};
use tracing::trace;

use crate::BUCKET_TYPE;
use crate::website::website_url;

/// Predicts the physical name and attributes of explicitly named buckets.
///
/// Buckets without a `BucketName` get an engine-generated name, so neither
/// their `Ref` nor their attributes can be known in advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Attributes;

impl AttributeResolver for S3Attributes {
    fn physical_id(
        &self,
        resource: &Resource,
        props: &dyn Fn(&str) -> TemplateResult<Option<String>>,
        _ctx: &DeployContext,
    ) -> Option<String> {
        if resource.type_name != BUCKET_TYPE {
            return None;
        }
        match props("BucketName") {
            Ok(name) => name,
            Err(e) => {
                trace!(error = %e, "bucket name is not predictable");
                None
            }
        }
    }

    fn attribute(
        &self,
        resource: &Resource,
        physical_id: Option<&str>,
        attribute: &str,
        ctx: &DeployContext,
    ) -> Option<String> {
        if resource.type_name != BUCKET_TYPE {
            return None;
        }
        let name = physical_id?;
        match attribute {
            "Arn" => Some(format!("arn:{}:s3:::{name}", ctx.partition)),
            "DomainName" => Some(format!("{name}.s3.{}", ctx.url_suffix)),
            "RegionalDomainName" => Some(format!("{name}.s3.{}.{}", ctx.region, ctx.url_suffix)),
            "WebsiteURL" => Some(website_url(name, &ctx.region, &ctx.url_suffix)),
            _ => None,
        }
    }
}
