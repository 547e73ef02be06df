//! S3 domain model for SiteStack.
//!
//! Covers what the synthesizer needs to know about S3: bucket naming rules,
//! website endpoint hostnames, the bucket property shapes used in templates,
//! IAM policy documents, and an [`S3Attributes`] resolver that predicts the
//! physical names and attributes of buckets at deploy time.

pub mod attributes;
pub mod error;
pub mod policy;
pub mod types;
pub mod validation;
pub mod website;

pub use attributes::S3Attributes;
pub use error::S3ModelError;
pub use policy::{PolicyDocument, Principal, Statement};
pub use types::{BucketProperties, PublicAccessBlockConfiguration, Tag, WebsiteConfiguration};

/// CloudFormation type of an S3 bucket.
pub const BUCKET_TYPE: &str = "AWS::S3::Bucket";

/// CloudFormation type of an S3 bucket policy.
pub const BUCKET_POLICY_TYPE: &str = "AWS::S3::BucketPolicy";
