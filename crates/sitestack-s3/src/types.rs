//! Bucket property shapes as they appear in `AWS::S3::Bucket` declarations.

use sitestack_template::{Expr, Resource};

use crate::BUCKET_TYPE;

/// Bucket website hosting configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteConfiguration {
    /// Object served for directory requests.
    pub index_document: String,
    /// Object served on 4xx errors.
    pub error_document: Option<String>,
}

impl WebsiteConfiguration {
    /// Website configuration with index and error documents.
    #[must_use]
    pub fn new(index_document: impl Into<String>, error_document: impl Into<String>) -> Self {
        Self {
            index_document: index_document.into(),
            error_document: Some(error_document.into()),
        }
    }
}

impl From<&WebsiteConfiguration> for Expr {
    fn from(w: &WebsiteConfiguration) -> Self {
        let mut entries = vec![("IndexDocument", Expr::str(&w.index_document))];
        if let Some(error) = &w.error_document {
            entries.push(("ErrorDocument", Expr::str(error)));
        }
        Expr::map(entries)
    }
}

/// The four public-access-block switches of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PublicAccessBlockConfiguration {
    /// Reject requests that set public ACLs.
    pub block_public_acls: bool,
    /// Reject bucket policies that grant public access.
    pub block_public_policy: bool,
    /// Ignore public ACLs on the bucket and its objects.
    pub ignore_public_acls: bool,
    /// Restrict access to buckets with public policies.
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlockConfiguration {
    /// Every switch off: public policies and ACLs take effect.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Every switch on.
    #[must_use]
    pub fn block_all() -> Self {
        Self {
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }
}

impl From<&PublicAccessBlockConfiguration> for Expr {
    fn from(p: &PublicAccessBlockConfiguration) -> Self {
        Expr::map([
            ("BlockPublicAcls", Expr::from(p.block_public_acls)),
            ("BlockPublicPolicy", Expr::from(p.block_public_policy)),
            ("IgnorePublicAcls", Expr::from(p.ignore_public_acls)),
            ("RestrictPublicBuckets", Expr::from(p.restrict_public_buckets)),
        ])
    }
}

/// A resource tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Create a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<&Tag> for Expr {
    fn from(t: &Tag) -> Self {
        Expr::map([("Key", Expr::str(&t.key)), ("Value", Expr::str(&t.value))])
    }
}

/// Properties of an `AWS::S3::Bucket` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketProperties {
    /// Bucket name, literal or deploy-time.
    pub bucket_name: Option<Expr>,
    /// Website hosting, if enabled.
    pub website: Option<WebsiteConfiguration>,
    /// Public access block.
    pub public_access_block: Option<PublicAccessBlockConfiguration>,
    /// Tags, kept sorted by key.
    pub tags: Vec<Tag>,
}

impl BucketProperties {
    /// Render as an `AWS::S3::Bucket` resource.
    #[must_use]
    pub fn to_resource(&self) -> Resource {
        let mut resource = Resource::new(BUCKET_TYPE);
        if let Some(name) = &self.bucket_name {
            resource = resource.property("BucketName", name.clone());
        }
        if let Some(website) = &self.website {
            resource = resource.property("WebsiteConfiguration", website);
        }
        if let Some(block) = &self.public_access_block {
            resource = resource.property("PublicAccessBlockConfiguration", block);
        }
        if !self.tags.is_empty() {
            let mut tags = self.tags.clone();
            tags.sort_by(|a, b| a.key.cmp(&b.key));
            resource = resource.property("Tags", Expr::list(tags.iter().map(Expr::from)));
        }
        resource
    }
}
