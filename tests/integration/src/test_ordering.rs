//! Apply and teardown ordering integration tests.

#[cfg(test)]
mod tests {
    use sitestack_core::Environment;

    use crate::{site_dir, synth};

    #[test]
    fn test_should_create_bucket_before_deployment_and_cleanup() {
        let dir = site_dir();
        let stack = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let order = stack.template().apply_order().expect("apply order");
        let pos = |id: &str| {
            order
                .iter()
                .position(|x| *x == id)
                .unwrap_or_else(|| panic!("{id} missing from {order:?}"))
        };

        let bucket = stack.bucket_ids();
        let bucket_pos = pos(bucket.bucket_id.as_str());
        let policy_pos = pos(bucket.policy_id.as_deref().expect("policy"));
        let cleanup_pos = pos(bucket.auto_delete_id.as_deref().expect("cleanup"));
        let deployment_pos = pos(stack.deployment_ids().resource_id.as_str());

        assert!(bucket_pos < policy_pos);
        assert!(policy_pos < deployment_pos);
        assert!(policy_pos < cleanup_pos);
        assert_eq!(order.len(), stack.template().resources.len());
    }

    #[test]
    fn test_should_empty_bucket_before_deleting_it() {
        let dir = site_dir();
        let stack = synth(Environment::agnostic(), &dir);
        let order = stack.template().teardown_order().expect("teardown order");
        let pos = |id: &str| order.iter().position(|x| *x == id).expect("present");

        let bucket = stack.bucket_ids();
        let cleanup = bucket.auto_delete_id.as_deref().expect("cleanup");
        let policy = bucket.policy_id.as_deref().expect("policy");
        assert!(pos(cleanup) < pos(policy));
        assert!(pos(policy) < pos(bucket.bucket_id.as_str()));
        assert!(pos(stack.deployment_ids().resource_id.as_str()) < pos(bucket.bucket_id.as_str()));
    }

    #[test]
    fn test_should_produce_identical_templates_for_identical_inputs() {
        let dir = site_dir();
        let a = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let b = synth(Environment::new("123456789012", "us-east-1"), &dir);
        assert_eq!(
            a.template().to_json_pretty().expect("render"),
            b.template().to_json_pretty().expect("render")
        );
        assert_eq!(
            a.template().apply_order().expect("order"),
            b.template().apply_order().expect("order")
        );
    }
}
