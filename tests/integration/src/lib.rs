//! End-to-end synthesis tests for SiteStack.
//!
//! Each test stages a scratch website directory, synthesizes the stack for
//! some environment, and inspects the rendered template or cloud assembly.
//!
//! ```text
//! cargo test -p sitestack-integration
//! ```

use std::fs;
use std::sync::Once;

use serde_json::Value;
use sitestack_core::Environment;
use sitestack_synth::{SiteStack, SiteStackProps};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A scratch directory holding a small website under `web/` and the Lambda
/// handler bundles under `handlers/`.
#[must_use]
pub fn site_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create tempdir: {e}"));
    let web = dir.path().join("web");
    fs::create_dir_all(web.join("css")).unwrap_or_else(|e| panic!("failed to create web/: {e}"));
    for (path, content) in [
        ("index.html", "<html><body><h1>Hello</h1></body></html>"),
        ("error.html", "<html><body><h1>Not found</h1></body></html>"),
        ("css/site.css", "body { font-family: sans-serif; }"),
    ] {
        fs::write(web.join(path), content).unwrap_or_else(|e| panic!("failed to write {path}: {e}"));
    }
    let handlers = dir.path().join("handlers");
    for (path, content) in [
        ("s3-auto-delete-objects/index.js", "exports.handler = async () => {};"),
        ("bucket-deployment/index.py", "def handler(event, context):\n    pass\n"),
        ("awscli-layer/awscli/aws", "#!/bin/sh\n"),
    ] {
        let file = handlers.join(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
        }
        fs::write(&file, content).unwrap_or_else(|e| panic!("failed to write {path}: {e}"));
    }
    dir
}

/// Synthesize the stack for `env` from the website and handlers in `dir`.
#[must_use]
pub fn synth(env: Environment, dir: &tempfile::TempDir) -> SiteStack {
    init_tracing();
    SiteStack::new(
        SiteStackProps::builder()
            .env(env)
            .asset_dir(dir.path().join("web"))
            .handler_dir(dir.path().join("handlers"))
            .build(),
    )
    .unwrap_or_else(|e| panic!("failed to synthesize stack: {e}"))
}

/// The stack's template as JSON.
#[must_use]
pub fn template_json(stack: &SiteStack) -> Value {
    stack
        .template()
        .to_json()
        .unwrap_or_else(|e| panic!("failed to render template: {e}"))
}

/// `(logical_id, resource)` pairs of one type in a rendered template.
#[must_use]
pub fn resources_of_type<'a>(template: &'a Value, type_name: &str) -> Vec<(&'a str, &'a Value)> {
    template["Resources"]
        .as_object()
        .map(|resources| {
            resources
                .iter()
                .filter(|(_, r)| r["Type"] == type_name)
                .map(|(id, r)| (id.as_str(), r))
                .collect()
        })
        .unwrap_or_default()
}

mod test_assembly;
mod test_bucket;
mod test_deployment;
mod test_ordering;
mod test_outputs;
