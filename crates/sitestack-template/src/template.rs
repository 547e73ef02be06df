//! The CloudFormation template document.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::expr::Expr;

/// What happens to a resource's physical counterpart on delete or replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    /// Physically delete the resource.
    Delete,
    /// Leave the resource in place.
    Retain,
    /// Snapshot, then delete.
    Snapshot,
}

/// A single resource declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    /// Resource type, e.g. `AWS::S3::Bucket`.
    #[serde(rename = "Type")]
    pub type_name: String,
    /// Resource properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Expr>,
    /// Explicit dependencies on other logical IDs.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub depends_on: BTreeSet<String>,
    /// Policy applied on stack deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
    /// Policy applied when an update replaces the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
}

impl Resource {
    /// Create a resource of the given type with no properties.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
            depends_on: BTreeSet::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    /// Set a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add an explicit dependency.
    #[must_use]
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.insert(logical_id.into());
        self
    }

    /// Set both the deletion and update-replace policies.
    #[must_use]
    pub fn removal_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }

    /// Every logical ID this resource depends on, explicit or via references.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<String> {
        let mut deps = self.depends_on.clone();
        for value in self.properties.values() {
            deps.extend(value.references());
        }
        deps
    }
}

/// A named stack output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Output value.
    pub value: Expr,
}

impl Output {
    /// Create an output with a description.
    #[must_use]
    pub fn new(value: Expr, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            value,
        }
    }
}

/// A template parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    /// Parameter type, e.g. `String`.
    #[serde(rename = "Type")]
    pub type_name: String,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One assertion of a template rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleAssertion {
    /// Condition that must hold.
    pub assert: Expr,
    /// Message shown when it does not.
    pub assert_description: String,
}

/// A template rule, evaluated by the engine before any change is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    /// Assertions that must all hold.
    pub assertions: Vec<RuleAssertion>,
}

/// A CloudFormation template.
///
/// Sections are kept in [`BTreeMap`]s so the JSON output is byte-for-byte
/// reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    /// Template description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared resources by logical ID.
    pub resources: BTreeMap<String, Resource>,
    /// Declared outputs by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
    /// Declared parameters by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,
    /// Declared rules by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, Rule>,
}

impl Template {
    /// Create an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource under `logical_id`.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the ID is taken.
    pub fn add_resource(
        &mut self,
        logical_id: impl Into<String>,
        resource: Resource,
    ) -> TemplateResult<()> {
        let logical_id = logical_id.into();
        if self.resources.contains_key(&logical_id) || self.parameters.contains_key(&logical_id) {
            return Err(TemplateError::DuplicateLogicalId(logical_id));
        }
        debug!(%logical_id, resource_type = %resource.type_name, "added resource");
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    /// Add an output under `name`.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the name is taken.
    pub fn add_output(&mut self, name: impl Into<String>, output: Output) -> TemplateResult<()> {
        let name = name.into();
        if self.outputs.contains_key(&name) {
            return Err(TemplateError::DuplicateLogicalId(name));
        }
        self.outputs.insert(name, output);
        Ok(())
    }

    /// Add a parameter under `name`.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the name is taken.
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        parameter: Parameter,
    ) -> TemplateResult<()> {
        let name = name.into();
        if self.parameters.contains_key(&name) || self.resources.contains_key(&name) {
            return Err(TemplateError::DuplicateLogicalId(name));
        }
        self.parameters.insert(name, parameter);
        Ok(())
    }

    /// Add a rule under `name`.
    ///
    /// # Errors
    /// Returns [`TemplateError::DuplicateLogicalId`] if the name is taken.
    pub fn add_rule(&mut self, name: impl Into<String>, rule: Rule) -> TemplateResult<()> {
        let name = name.into();
        if self.rules.contains_key(&name) {
            return Err(TemplateError::DuplicateLogicalId(name));
        }
        self.rules.insert(name, rule);
        Ok(())
    }

    /// Look up a resource by logical ID.
    #[must_use]
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Iterate over `(logical_id, resource)` pairs of one resource type.
    pub fn resources_of_type<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.type_name == type_name)
            .map(|(id, r)| (id.as_str(), r))
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`TemplateError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> TemplateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a JSON value.
    ///
    /// # Errors
    /// Returns [`TemplateError::Json`] if serialization fails.
    pub fn to_json(&self) -> TemplateResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bucket() -> Resource {
        Resource::new("AWS::S3::Bucket")
            .property("BucketName", "site")
            .removal_policy(DeletionPolicy::Delete)
    }

    #[test]
    fn test_should_serialize_resource_attributes_at_resource_level() {
        let json = serde_json::to_value(bucket()).expect("serialize");
        assert_eq!(
            json,
            json!({
                "Type": "AWS::S3::Bucket",
                "Properties": {"BucketName": "site"},
                "DeletionPolicy": "Delete",
                "UpdateReplacePolicy": "Delete",
            })
        );
    }

    #[test]
    fn test_should_reject_duplicate_logical_ids() {
        let mut t = Template::new();
        t.add_resource("Bucket", bucket()).expect("first insert");
        assert!(matches!(
            t.add_resource("Bucket", bucket()),
            Err(TemplateError::DuplicateLogicalId(id)) if id == "Bucket"
        ));
        t.add_output("BucketName", Output::new(Expr::reference("Bucket"), "name"))
            .expect("first output");
        assert!(
            t.add_output("BucketName", Output::new(Expr::reference("Bucket"), "name"))
                .is_err()
        );
    }

    #[test]
    fn test_should_collect_explicit_and_implicit_dependencies() {
        let r = Resource::new("AWS::S3::BucketPolicy")
            .property("Bucket", Expr::reference("Bucket"))
            .property("Role", Expr::get_att("Role", "Arn"))
            .depends_on("Other");
        let deps: Vec<_> = r.dependencies().into_iter().collect();
        assert_eq!(deps, vec!["Bucket", "Other", "Role"]);
    }

    #[test]
    fn test_should_omit_empty_sections() {
        let mut t = Template::new();
        t.add_resource("Bucket", bucket()).expect("insert");
        let json = t.to_json().expect("serialize");
        assert!(json.get("Resources").is_some());
        assert!(json.get("Outputs").is_none());
        assert!(json.get("Parameters").is_none());
        assert_eq!(t.resources_of_type("AWS::S3::Bucket").count(), 1);
        assert_eq!(t.resources_of_type("AWS::S3::BucketPolicy").count(), 0);
    }
}
