//! Website bucket integration tests.

#[cfg(test)]
mod tests {
    use regex::Regex;
    use serde_json::json;
    use sitestack_core::{AwsRegion, Environment};

    use crate::{resources_of_type, site_dir, synth, template_json};

    #[test]
    fn test_should_name_bucket_after_account_and_region() {
        let dir = site_dir();
        let pattern = Regex::new(r"^\d{12}-[a-z0-9-]+-static-website$").expect("regex");

        for (account, region) in [
            ("123456789012", "us-east-1"),
            ("987654321098", "eu-west-1"),
            ("111122223333", "us-west-2"),
            ("444455556666", "ap-southeast-1"),
        ] {
            let stack = synth(Environment::new(account, region), &dir);
            let template = template_json(&stack);
            let buckets = resources_of_type(&template, "AWS::S3::Bucket");
            assert_eq!(buckets.len(), 1);

            let name = buckets[0].1["Properties"]["BucketName"]
                .as_str()
                .expect("literal bucket name");
            assert_eq!(name, format!("{account}-{region}-static-website"));
            assert!(pattern.is_match(name), "{name} should match {pattern}");
        }
    }

    #[test]
    fn test_should_configure_website_hosting() {
        let dir = site_dir();
        for env in [
            Environment::new("123456789012", "us-east-1"),
            Environment::agnostic(),
            Environment {
                region: Some(AwsRegion::new("eu-west-1")),
                ..Environment::agnostic()
            },
        ] {
            let label = env.to_string();
            let stack = synth(env, &dir);
            let template = template_json(&stack);
            let (_, bucket) = resources_of_type(&template, "AWS::S3::Bucket")[0];

            assert_eq!(
                bucket["Properties"]["WebsiteConfiguration"],
                json!({"IndexDocument": "index.html", "ErrorDocument": "error.html"}),
                "{label}"
            );
            assert_eq!(
                bucket["Properties"]["PublicAccessBlockConfiguration"],
                json!({
                    "BlockPublicAcls": false,
                    "BlockPublicPolicy": false,
                    "IgnorePublicAcls": false,
                    "RestrictPublicBuckets": false,
                }),
                "{label}"
            );
            assert_eq!(bucket["DeletionPolicy"], "Delete", "{label}");
            assert_eq!(bucket["UpdateReplacePolicy"], "Delete", "{label}");
        }
    }

    #[test]
    fn test_should_allow_public_reads() {
        let dir = site_dir();
        let stack = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let template = template_json(&stack);
        let (bucket_id, _) = resources_of_type(&template, "AWS::S3::Bucket")[0];
        let policies = resources_of_type(&template, "AWS::S3::BucketPolicy");
        assert_eq!(policies.len(), 1);

        let policy = &policies[0].1["Properties"];
        assert_eq!(policy["Bucket"], json!({"Ref": bucket_id}));
        let public = policy["PolicyDocument"]["Statement"]
            .as_array()
            .expect("statements")
            .iter()
            .find(|s| s["Principal"] == json!({"AWS": "*"}))
            .expect("public statement");
        assert_eq!(public["Action"], "s3:GetObject");
        assert_eq!(public["Effect"], "Allow");
        assert_eq!(
            public["Resource"],
            json!({"Fn::Join": ["", [{"Fn::GetAtt": [bucket_id, "Arn"]}, "/*"]]})
        );
    }

    #[test]
    fn test_should_defer_bucket_name_without_environment() {
        let dir = site_dir();
        for env in [
            Environment::agnostic(),
            Environment {
                region: Some(AwsRegion::new("us-east-1")),
                ..Environment::agnostic()
            },
        ] {
            let stack = synth(env, &dir);
            let template = template_json(&stack);
            let (_, bucket) = resources_of_type(&template, "AWS::S3::Bucket")[0];
            let name = &bucket["Properties"]["BucketName"];
            assert!(name.get("Fn::Join").is_some(), "{name} should be a join");
            assert_eq!(name["Fn::Join"][1][0], json!({"Ref": "AWS::AccountId"}));
            assert!(stack.website_domain().is_none());
        }
    }

    #[test]
    fn test_should_tag_bucket_for_auto_delete() {
        let dir = site_dir();
        let stack = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let template = template_json(&stack);
        let (bucket_id, bucket) = resources_of_type(&template, "AWS::S3::Bucket")[0];

        assert_eq!(
            bucket["Properties"]["Tags"],
            json!([{"Key": "aws-cdk:auto-delete-objects", "Value": "true"}])
        );
        let cleanups = resources_of_type(&template, "Custom::S3AutoDeleteObjects");
        assert_eq!(cleanups.len(), 1);
        assert_eq!(
            cleanups[0].1["Properties"]["BucketName"],
            json!({"Ref": bucket_id})
        );
    }
}
