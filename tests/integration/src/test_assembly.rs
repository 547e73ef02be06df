//! Cloud assembly integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs::{self, File};

    use serde_json::Value;
    use sitestack_core::Environment;
    use sitestack_synth::CloudAssembly;

    use crate::{resources_of_type, site_dir, synth};

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("parse")
    }

    /// Every object key the template asks the engine to fetch from the
    /// assets bucket: Lambda code, layer content, and deployment sources.
    fn referenced_object_keys(value: &Value, keys: &mut BTreeSet<String>) {
        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    match (name.as_str(), child) {
                        ("S3Key", Value::String(key)) => {
                            keys.insert(key.clone());
                        }
                        ("SourceObjectKeys", Value::Array(items)) => {
                            keys.extend(items.iter().filter_map(Value::as_str).map(str::to_owned));
                        }
                        _ => referenced_object_keys(child, keys),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    referenced_object_keys(item, keys);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_should_publish_every_referenced_object() {
        for env in [
            Environment::new("123456789012", "us-east-1"),
            Environment::agnostic(),
        ] {
            let dir = site_dir();
            let stack = synth(env, &dir);
            let assembly =
                CloudAssembly::write(&stack, dir.path().join("cdk.out")).expect("write");

            let mut referenced = BTreeSet::new();
            referenced_object_keys(&read_json(&assembly.template_file), &mut referenced);
            assert_eq!(referenced.len(), 4, "website, two handlers, layer: {referenced:?}");

            let assets = read_json(&assembly.assets_file);
            let files = assets["files"].as_object().expect("files");
            let published: BTreeSet<String> = files
                .values()
                .filter_map(|f| {
                    f["destinations"]["current_account-current_region"]["objectKey"].as_str()
                })
                .map(str::to_owned)
                .collect();
            for key in &referenced {
                assert!(published.contains(key), "{key} is not published: {published:?}");
            }

            for file in files.values() {
                let path = file["source"]["path"].as_str().expect("source path");
                assert!(assembly.dir.join(path).is_file(), "{path} missing from assembly");
            }
        }
    }

    #[test]
    fn test_should_write_complete_assembly_without_environment() {
        let dir = site_dir();
        let stack = synth(Environment::agnostic(), &dir);
        let assembly = CloudAssembly::write(&stack, dir.path().join("cdk.out")).expect("write");

        let template = read_json(&assembly.template_file);
        assert_eq!(resources_of_type(&template, "AWS::S3::Bucket").len(), 1);
        assert_eq!(resources_of_type(&template, "AWS::S3::BucketPolicy").len(), 1);
        assert_eq!(
            resources_of_type(&template, "Custom::CDKBucketDeployment").len(),
            1
        );
        assert_eq!(template["Outputs"].as_object().map(serde_json::Map::len), Some(2));
        assert!(template["Parameters"]["BootstrapVersion"].is_object());
        assert!(template["Rules"]["CheckBootstrapVersion"].is_object());

        let manifest = read_json(&assembly.manifest_file);
        assert_eq!(
            manifest["artifacts"]["S3StaticWebappStack"]["environment"],
            "aws://unknown-account/unknown-region"
        );
        assert_eq!(
            manifest["artifacts"]["S3StaticWebappStack"]["properties"]["templateFile"],
            "S3StaticWebappStack.template.json"
        );
    }

    #[test]
    fn test_should_package_every_site_file() {
        let dir = site_dir();
        let stack = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let assembly = CloudAssembly::write(&stack, dir.path().join("cdk.out")).expect("write");

        assert_eq!(
            assembly.archive.file_name().and_then(|n| n.to_str()),
            Some(stack.asset().archive_name().as_str())
        );
        let archive =
            zip::ZipArchive::new(File::open(&assembly.archive).expect("open")).expect("zip");
        let mut names: Vec<_> = archive.file_names().map(str::to_owned).collect();
        names.sort();
        assert_eq!(names, vec!["css/site.css", "error.html", "index.html"]);

        let assets = read_json(&assembly.assets_file);
        let file = &assets["files"][stack.asset().fingerprint()];
        assert_eq!(file["source"]["path"], stack.asset().archive_name());
        assert_eq!(
            file["destinations"]["current_account-current_region"]["objectKey"],
            stack.asset().object_key()
        );
    }

    #[test]
    fn test_should_rewrite_assembly_byte_for_byte() {
        let dir = site_dir();
        let stack = synth(Environment::new("123456789012", "us-east-1"), &dir);
        let first = CloudAssembly::write(&stack, dir.path().join("a")).expect("write a");
        let second = CloudAssembly::write(&stack, dir.path().join("b")).expect("write b");

        for (a, b) in [
            (&first.template_file, &second.template_file),
            (&first.assets_file, &second.assets_file),
            (&first.manifest_file, &second.manifest_file),
            (&first.archive, &second.archive),
        ] {
            assert_eq!(fs::read(a).expect("read a"), fs::read(b).expect("read b"));
        }
        for (a, b) in first.handler_archives.iter().zip(&second.handler_archives) {
            assert_eq!(fs::read(a).expect("read a"), fs::read(b).expect("read b"));
        }
    }
}
