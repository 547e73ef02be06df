//! Stack output integration tests.

#[cfg(test)]
mod tests {
    use regex::Regex;
    use serde_json::json;
    use sitestack_core::Environment;
    use sitestack_s3::S3Attributes;
    use sitestack_template::{DeployContext, Resolved};

    use crate::{site_dir, synth, template_json};

    #[test]
    fn test_should_declare_two_described_outputs() {
        let dir = site_dir();
        let stack = synth(Environment::agnostic(), &dir);
        let template = template_json(&stack);
        let outputs = template["Outputs"].as_object().expect("outputs");

        assert_eq!(outputs.len(), 2);
        assert_eq!(
            outputs["WebsiteURL"]["Description"],
            "URL of the static website"
        );
        assert_eq!(outputs["BucketName"]["Description"], "Name of the S3 bucket");
        assert_eq!(
            outputs["BucketName"]["Value"],
            json!({"Ref": stack.bucket_ids().bucket_id})
        );
    }

    #[test]
    fn test_should_resolve_website_hostname() {
        let dir = site_dir();
        let stack = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let pattern =
            Regex::new(r"^[a-z0-9-]+\.s3-website-[a-z0-9-]+\.amazonaws\.com$").expect("regex");

        let domain = stack.website_domain().expect("concrete environment");
        assert!(pattern.is_match(&domain), "{domain} should match {pattern}");
        assert!(domain.contains("123456789012-us-east-1-static-website"));
        assert!(domain.contains("us-east-1"));
    }

    #[test]
    fn test_should_resolve_outputs_for_deploy_context() {
        let dir = site_dir();
        let stack = synth(Environment::new("987654321098", "eu-west-1"), &dir);
        let ctx = stack.deploy_context().expect("concrete environment");

        assert_eq!(
            stack
                .template()
                .resolve_output("BucketName", &ctx, &S3Attributes)
                .expect("bucket name"),
            Resolved::Str("987654321098-eu-west-1-static-website".to_owned())
        );
        assert_eq!(
            stack
                .template()
                .resolve_output("WebsiteURL", &ctx, &S3Attributes)
                .expect("website url"),
            Resolved::Str(
                "987654321098-eu-west-1-static-website.s3-website-eu-west-1.amazonaws.com"
                    .to_owned()
            )
        );
    }

    #[test]
    fn test_should_resolve_deferred_name_at_deploy_time() {
        let dir = site_dir();
        let stack = synth(Environment::agnostic(), &dir);
        let ctx = DeployContext::from_environment(
            &Environment::new("111122223333", "eu-central-1"),
            stack.name(),
        )
        .expect("concrete environment");

        let url = stack
            .template()
            .resolve_output("WebsiteURL", &ctx, &S3Attributes)
            .expect("website url");
        assert_eq!(
            url.as_str(),
            Some("111122223333-eu-central-1-static-website.s3-website.eu-central-1.amazonaws.com")
        );
        assert!(
            stack
                .template()
                .resolve_output("Missing", &ctx, &S3Attributes)
                .is_err()
        );
    }
}
