//! Cloud assembly writer.
//!
//! The cloud assembly is the directory the CDK toolkit deploys from: the
//! template, an asset manifest telling it what to publish where, one archive
//! per asset (the website and each handler bundle), and `manifest.json`
//! tying them together.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::asset::Asset;
use crate::constructs::BOOTSTRAP_QUALIFIER;
use crate::constructs::bootstrap::{MIN_BOOTSTRAP_VERSION, version_ssm_parameter};
use crate::error::{SynthError, SynthResult};
use crate::stack::SiteStack;

/// Cloud assembly schema version the manifests conform to.
pub const SCHEMA_VERSION: &str = "36.0.0";

/// Asset manifest (`{stack}.assets.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    /// Schema version.
    pub version: String,
    /// File assets by fingerprint.
    pub files: BTreeMap<String, FileAsset>,
    /// Container image assets; always empty.
    pub docker_images: BTreeMap<String, serde_json::Value>,
}

/// One file asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    /// Where the asset is in the assembly.
    pub source: FileSource,
    /// Where it is published to.
    pub destinations: BTreeMap<String, FileDestination>,
}

/// Location of a file asset inside the assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    /// Path relative to the assembly directory.
    pub path: String,
    /// `file` for a ready-made archive, `zip` for a directory to be zipped.
    pub packaging: String,
}

/// Publishing destination of a file asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDestination {
    /// Target bucket, with pseudo-parameter placeholders.
    pub bucket_name: String,
    /// Target object key.
    pub object_key: String,
    /// Role assumed for publishing.
    pub assume_role_arn: String,
}

/// Assembly manifest (`manifest.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyManifest {
    /// Schema version.
    pub version: String,
    /// Artifacts by ID.
    pub artifacts: BTreeMap<String, Artifact>,
}

/// One artifact of the assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Artifact type.
    #[serde(rename = "type")]
    pub artifact_type: String,
    /// `aws://{account}/{region}` for stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Type-specific properties.
    pub properties: ArtifactProperties,
    /// Artifacts that must be deployed first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Name shown by the toolkit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Properties of a stack or asset-manifest artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactProperties {
    /// Template file, for stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    /// Stack name, for stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,
    /// Asset manifest file, for asset manifests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Minimum bootstrap version.
    pub requires_bootstrap_stack_version: u32,
    /// SSM parameter holding the installed bootstrap version.
    pub bootstrap_stack_version_ssm_parameter: String,
}

/// Paths of a written cloud assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudAssembly {
    /// Assembly directory.
    pub dir: PathBuf,
    /// `{stack}.template.json`.
    pub template_file: PathBuf,
    /// `{stack}.assets.json`.
    pub assets_file: PathBuf,
    /// `manifest.json`.
    pub manifest_file: PathBuf,
    /// `asset.{fingerprint}.zip` of the website.
    pub archive: PathBuf,
    /// Archives of the handler and layer bundles.
    pub handler_archives: Vec<PathBuf>,
}

impl CloudAssembly {
    /// Write `stack` as a cloud assembly into `out_dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns [`SynthError::Io`] if a file cannot be written, or a
    /// serialization or packaging error.
    pub fn write(stack: &SiteStack, out_dir: impl AsRef<Path>) -> SynthResult<Self> {
        let dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| SynthError::io(&dir, e))?;

        let archive = stack.asset().package(&dir)?;
        let handler_archives = stack
            .handlers()
            .iter()
            .map(|bundle| bundle.package(&dir))
            .collect::<SynthResult<Vec<_>>>()?;

        let template_name = format!("{}.template.json", stack.name());
        let template_file = dir.join(&template_name);
        write_file(&template_file, &stack.template().to_json_pretty()?)?;

        let assets_name = format!("{}.assets.json", stack.name());
        let assets_file = dir.join(&assets_name);
        write_file(
            &assets_file,
            &serde_json::to_string_pretty(&asset_manifest(stack))?,
        )?;

        let manifest_file = dir.join("manifest.json");
        write_file(
            &manifest_file,
            &serde_json::to_string_pretty(&assembly_manifest(stack, template_name, assets_name))?,
        )?;

        info!(
            dir = %dir.display(),
            stack = %stack.name(),
            archives = handler_archives.len() + 1,
            "wrote cloud assembly"
        );
        Ok(Self {
            dir,
            template_file,
            assets_file,
            manifest_file,
            archive,
            handler_archives,
        })
    }
}

fn write_file(path: &Path, contents: &str) -> SynthResult<()> {
    fs::write(path, contents).map_err(|e| SynthError::io(path, e))
}

fn asset_manifest(stack: &SiteStack) -> AssetManifest {
    AssetManifest {
        version: SCHEMA_VERSION.to_owned(),
        files: stack
            .assets()
            .map(|asset| (asset.fingerprint().to_owned(), file_asset(asset)))
            .collect(),
        docker_images: BTreeMap::new(),
    }
}

fn file_asset(asset: &Asset) -> FileAsset {
    let destination = FileDestination {
        bucket_name: format!("cdk-{BOOTSTRAP_QUALIFIER}-assets-${{AWS::AccountId}}-${{AWS::Region}}"),
        object_key: asset.object_key(),
        assume_role_arn: format!(
            "arn:${{AWS::Partition}}:iam::${{AWS::AccountId}}:role/cdk-{BOOTSTRAP_QUALIFIER}-file-publishing-role-${{AWS::AccountId}}-${{AWS::Region}}"
        ),
    };
    FileAsset {
        source: FileSource {
            path: asset.archive_name(),
            packaging: "file".to_owned(),
        },
        destinations: BTreeMap::from([(
            "current_account-current_region".to_owned(),
            destination,
        )]),
    }
}

fn assembly_manifest(
    stack: &SiteStack,
    template_name: String,
    assets_name: String,
) -> AssemblyManifest {
    let assets_id = format!("{}.assets", stack.name());
    let assets = Artifact {
        artifact_type: "cdk:asset-manifest".to_owned(),
        environment: None,
        properties: ArtifactProperties {
            template_file: None,
            stack_name: None,
            file: Some(assets_name),
            requires_bootstrap_stack_version: MIN_BOOTSTRAP_VERSION,
            bootstrap_stack_version_ssm_parameter: version_ssm_parameter(),
        },
        dependencies: Vec::new(),
        display_name: None,
    };
    let stack_artifact = Artifact {
        artifact_type: "aws:cloudformation:stack".to_owned(),
        environment: Some(stack.env().uri()),
        properties: ArtifactProperties {
            template_file: Some(template_name),
            stack_name: Some(stack.name().to_owned()),
            file: None,
            requires_bootstrap_stack_version: MIN_BOOTSTRAP_VERSION,
            bootstrap_stack_version_ssm_parameter: version_ssm_parameter(),
        },
        dependencies: vec![assets_id.clone()],
        display_name: Some(stack.name().to_owned()),
    };
    AssemblyManifest {
        version: SCHEMA_VERSION.to_owned(),
        artifacts: BTreeMap::from([
            (assets_id, assets),
            (stack.name().to_owned(), stack_artifact),
        ]),
    }
}
