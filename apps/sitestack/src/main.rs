//! SiteStack - static website stack synthesizer.
//!
//! Synthesizes a public S3 website bucket, the deployment of a local
//! directory into it, and teardown cleanup into a CDK cloud assembly. The
//! template is also printed to stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! CDK_DEFAULT_ACCOUNT=123456789012 CDK_DEFAULT_REGION=us-east-1 sitestack
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CDK_DEFAULT_ACCOUNT` | *(unset)* | Target account; resolved at deploy time if unset |
//! | `CDK_DEFAULT_REGION` | *(unset)* | Target region; resolved at deploy time if unset |
//! | `SITE_STACK_NAME` | `S3StaticWebappStack` | Stack name |
//! | `SITE_ASSET_DIR` | `./web` | Website files |
//! | `SITE_HANDLER_DIR` | `./handlers` | Prebuilt Lambda handler and layer bundles |
//! | `CDK_OUTDIR` | `cdk.out` | Cloud assembly directory |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::Write;

use anyhow::{Context, Result};
use sitestack_core::SiteConfig;
use sitestack_synth::{CloudAssembly, SiteStack, SiteStackProps};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so that stdout carries only the template.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Synthesize the stack and write its cloud assembly.
fn synthesize(config: &SiteConfig) -> Result<(SiteStack, CloudAssembly)> {
    let stack = SiteStack::new(SiteStackProps::from(config)).with_context(|| {
        format!(
            "failed to synthesize stack {} from {}",
            config.stack_name,
            config.asset_dir.display()
        )
    })?;
    let assembly = CloudAssembly::write(&stack, &config.out_dir).with_context(|| {
        format!(
            "failed to write cloud assembly to {}",
            config.out_dir.display()
        )
    })?;
    Ok((stack, assembly))
}

fn main() -> Result<()> {
    let config = SiteConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        stack = %config.stack_name,
        env = %config.environment(),
        asset_dir = %config.asset_dir.display(),
        handler_dir = %config.handler_dir.display(),
        out_dir = %config.out_dir.display(),
        version = VERSION,
        "synthesizing site stack",
    );

    let (stack, assembly) = synthesize(&config)?;

    let template = stack
        .template()
        .to_json_pretty()
        .context("failed to render template")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{template}").context("failed to write template to stdout")?;

    if let Some(domain) = stack.website_domain() {
        info!(
            stack = %stack.name(),
            bucket = ?stack.bucket_name().as_str(),
            website = %domain,
            assembly = %assembly.dir.display(),
            "synthesis complete",
        );
    } else {
        info!(
            stack = %stack.name(),
            assembly = %assembly.dir.display(),
            "synthesis complete; website URL is resolved at deploy time",
        );
    }

    Ok(())
}
