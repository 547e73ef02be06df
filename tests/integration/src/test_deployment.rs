//! Asset deployment integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sitestack_core::Environment;

    use crate::{resources_of_type, site_dir, synth, template_json};

    #[test]
    fn test_should_deploy_to_bucket_root() {
        let dir = site_dir();
        let stack = synth(Environment::new("987654321098", "eu-west-1"), &dir);
        let template = template_json(&stack);
        let (bucket_id, _) = resources_of_type(&template, "AWS::S3::Bucket")[0];

        let deployments = resources_of_type(&template, "Custom::CDKBucketDeployment");
        assert_eq!(deployments.len(), 1);
        let props = &deployments[0].1["Properties"];
        assert_eq!(props["DestinationBucketKeyPrefix"], "");
        assert_eq!(props["DestinationBucketName"], json!({"Ref": bucket_id}));
        assert_eq!(props["Prune"], true);
        assert_eq!(stack.deployment().destination_prefix, "");
    }

    #[test]
    fn test_should_reference_staged_asset() {
        let dir = site_dir();
        let stack = synth(Environment::new("987654321098", "eu-west-1"), &dir);
        let template = template_json(&stack);
        let (_, deployment) = resources_of_type(&template, "Custom::CDKBucketDeployment")[0];

        assert_eq!(
            deployment["Properties"]["SourceObjectKeys"],
            json!([format!("{}.zip", stack.asset().fingerprint())])
        );
        assert_eq!(
            deployment["Properties"]["SourceBucketNames"],
            json!([{"Fn::Sub": "cdk-hnb659fds-assets-${AWS::AccountId}-${AWS::Region}"}])
        );
        let files: Vec<_> = stack
            .asset()
            .files()
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(files, vec!["css/site.css", "error.html", "index.html"]);
    }

    #[test]
    fn test_should_keep_fingerprint_stable_across_environments() {
        let dir = site_dir();
        let a = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let b = synth(Environment::agnostic(), &dir);
        assert_eq!(a.asset().fingerprint(), b.asset().fingerprint());

        let other = site_dir();
        std::fs::write(other.path().join("web/index.html"), "<h1>changed</h1>").expect("write");
        let c = synth(Environment::agnostic(), &other);
        assert_ne!(a.asset().fingerprint(), c.asset().fingerprint());
    }

    #[test]
    fn test_should_grant_handler_access_to_destination() {
        let dir = site_dir();
        let stack = synth(Environment::new("987654321098", "eu-west-1"), &dir);
        let template = template_json(&stack);
        let (bucket_id, _) = resources_of_type(&template, "AWS::S3::Bucket")[0];

        let policies = resources_of_type(&template, "AWS::IAM::Policy");
        assert_eq!(policies.len(), 1);
        let statements = policies[0].1["Properties"]["PolicyDocument"]["Statement"]
            .as_array()
            .expect("statements");
        let destination = statements
            .iter()
            .find(|s| s["Resource"][0] == json!({"Fn::GetAtt": [bucket_id, "Arn"]}))
            .expect("destination statement");
        let actions = destination["Action"].as_array().expect("actions");
        assert!(actions.contains(&json!("s3:PutObject")));
        assert!(actions.contains(&json!("s3:DeleteObject*")));
    }
}
