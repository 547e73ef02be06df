//! The static website stack.

use std::path::PathBuf;

use sitestack_core::{Environment, SiteConfig};
use sitestack_s3::S3Attributes;
use sitestack_s3::validation::{WEBSITE_BUCKET_SUFFIX, validate_bucket_name, website_bucket_name};
use sitestack_s3::website::website_domain;
use sitestack_template::{DeployContext, Expr, Output, Template, logical_id, pseudo};
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use crate::asset::Asset;
use crate::constructs::{HandlerAssets, bootstrap};
use crate::constructs::deployment::{BucketDeployment, DeploymentDescriptor};
use crate::constructs::website_bucket::{BucketDescriptor, WebsiteBucket};
use crate::error::SynthResult;

/// Default stack name.
pub const DEFAULT_STACK_NAME: &str = "S3StaticWebappStack";

/// Output carrying the website hostname.
pub const WEBSITE_URL_OUTPUT: &str = "WebsiteURL";

/// Output carrying the bucket name.
pub const BUCKET_NAME_OUTPUT: &str = "BucketName";

const BUCKET_CONSTRUCT: &str = "WebsiteBucket";
const DEPLOYMENT_CONSTRUCT: &str = "DeployWebsite";

/// Inputs of a [`SiteStack`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SiteStackProps {
    /// Stack name.
    #[builder(default = DEFAULT_STACK_NAME.to_owned(), setter(into))]
    pub stack_name: String,
    /// Target environment; unpinned parts are resolved at deploy time.
    #[builder(default)]
    pub env: Environment,
    /// Directory holding the website files.
    #[builder(default = PathBuf::from("./web"), setter(into))]
    pub asset_dir: PathBuf,
    /// Directory holding the prebuilt Lambda handler and layer bundles.
    #[builder(default = PathBuf::from("./handlers"), setter(into))]
    pub handler_dir: PathBuf,
}

impl From<&SiteConfig> for SiteStackProps {
    fn from(config: &SiteConfig) -> Self {
        Self::builder()
            .stack_name(config.stack_name.clone())
            .env(config.environment())
            .asset_dir(config.asset_dir.clone())
            .handler_dir(config.handler_dir.clone())
            .build()
    }
}

/// A synthesized static website stack.
#[derive(Debug, Clone)]
pub struct SiteStack {
    name: String,
    env: Environment,
    template: Template,
    bucket: BucketDescriptor,
    deployment: DeploymentDescriptor,
    bucket_ids: WebsiteBucket,
    deployment_ids: BucketDeployment,
    asset: Asset,
    handlers: HandlerAssets,
}

impl SiteStack {
    /// Stage the website files and handler bundles, and build the template.
    ///
    /// An unpinned account or region is not an error: the bucket name then
    /// refers to the pseudo parameters.
    ///
    /// # Errors
    /// Returns [`crate::SynthError::AssetNotFound`] if the asset directory is
    /// missing, [`crate::SynthError::HandlerBundleMissing`] if a handler
    /// bundle is, or an I/O error while fingerprinting either.
    pub fn new(props: SiteStackProps) -> SynthResult<Self> {
        let SiteStackProps {
            stack_name,
            env,
            asset_dir,
            handler_dir,
        } = props;

        check_environment(&env);
        let bucket = BucketDescriptor::website(bucket_name(&env));
        if let Some(name) = bucket.name.as_str()
            && let Err(e) = validate_bucket_name(name)
        {
            warn!(error = %e, "bucket name violates S3 naming rules");
        }

        let deployment = DeploymentDescriptor::to_root(asset_dir);
        let asset = Asset::stage(&deployment.source_dir)?;
        let handlers = HandlerAssets::stage(&handler_dir)?;

        let mut template = Template::new();
        let bucket_ids =
            WebsiteBucket::declare(&mut template, BUCKET_CONSTRUCT, &bucket, &handlers)?;
        let deployment_ids = BucketDeployment::declare(
            &mut template,
            DEPLOYMENT_CONSTRUCT,
            &asset,
            &deployment,
            &bucket_ids,
            &handlers,
        )?;

        template.add_output(
            logical_id(&[WEBSITE_URL_OUTPUT]),
            Output::new(
                Expr::select(
                    2,
                    Expr::split("/", Expr::get_att(&bucket_ids.bucket_id, "WebsiteURL")),
                ),
                "URL of the static website",
            ),
        )?;
        template.add_output(
            logical_id(&[BUCKET_NAME_OUTPUT]),
            Output::new(
                Expr::reference(&bucket_ids.bucket_id),
                "Name of the S3 bucket",
            ),
        )?;
        bootstrap::declare(&mut template)?;

        info!(
            stack = %stack_name,
            env = %env,
            resources = template.resources.len(),
            "synthesized stack"
        );
        Ok(Self {
            name: stack_name,
            env,
            template,
            bucket,
            deployment,
            bucket_ids,
            deployment_ids,
            asset,
            handlers,
        })
    }

    /// Stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target environment.
    #[must_use]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The template.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Bucket name: a literal for a pinned environment, deploy-time otherwise.
    #[must_use]
    pub fn bucket_name(&self) -> &Expr {
        &self.bucket.name
    }

    /// The staged website asset.
    #[must_use]
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// The staged handler and layer bundles.
    #[must_use]
    pub fn handlers(&self) -> &HandlerAssets {
        &self.handlers
    }

    /// Every asset the template references: the website, then the bundles.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        std::iter::once(&self.asset).chain(self.handlers.iter())
    }

    /// The website bucket descriptor.
    #[must_use]
    pub fn bucket(&self) -> &BucketDescriptor {
        &self.bucket
    }

    /// The deployment descriptor.
    #[must_use]
    pub fn deployment(&self) -> &DeploymentDescriptor {
        &self.deployment
    }

    /// Logical IDs of the bucket resources.
    #[must_use]
    pub fn bucket_ids(&self) -> &WebsiteBucket {
        &self.bucket_ids
    }

    /// Logical IDs of the deployment resources.
    #[must_use]
    pub fn deployment_ids(&self) -> &BucketDeployment {
        &self.deployment_ids
    }

    /// Deploy context for a pinned environment.
    #[must_use]
    pub fn deploy_context(&self) -> Option<DeployContext> {
        DeployContext::from_environment(&self.env, &self.name)
    }

    /// The website hostname, known only for a pinned environment.
    ///
    /// This is the value the `WebsiteURL` output resolves to.
    #[must_use]
    pub fn website_domain(&self) -> Option<String> {
        let ctx = self.deploy_context()?;
        match self
            .template
            .resolve_output(WEBSITE_URL_OUTPUT, &ctx, &S3Attributes)
        {
            Ok(resolved) => resolved.as_str().map(str::to_owned),
            Err(e) => {
                warn!(error = %e, "cannot resolve website URL");
                let name = self.bucket.name.as_str()?;
                Some(website_domain(name, &ctx.region, &ctx.url_suffix))
            }
        }
    }
}

/// `{account}-{region}-static-website`, with unpinned parts left to the engine.
fn bucket_name(env: &Environment) -> Expr {
    if let (Some(account), Some(region)) = (&env.account, &env.region) {
        return Expr::str(website_bucket_name(account.as_str(), region.as_str()));
    }
    let account = env.account.as_ref().map_or_else(
        || Expr::reference(pseudo::ACCOUNT_ID),
        |a| Expr::str(a.as_str()),
    );
    let region = env.region.as_ref().map_or_else(
        || Expr::reference(pseudo::REGION),
        |r| Expr::str(r.as_str()),
    );
    Expr::join(
        "",
        [
            account,
            Expr::str("-"),
            region,
            Expr::str(format!("-{WEBSITE_BUCKET_SUFFIX}")),
        ],
    )
}

fn check_environment(env: &Environment) {
    if let Some(account) = &env.account
        && let Err(e) = account.validate()
    {
        warn!(error = %e, "account ID looks malformed");
    }
    if let Some(region) = &env.region
        && let Err(e) = region.validate()
    {
        warn!(error = %e, "region looks malformed");
    }
}
