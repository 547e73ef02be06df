//! Deploy-time evaluation of template expressions.
//!
//! The engine resolves intrinsic functions while applying the template. For a
//! concrete account and region most values of a static site stack are
//! predictable in advance; this module evaluates them so outputs can be
//! previewed at synthesis time. Resource attributes are delegated to an
//! [`AttributeResolver`], which knows how a given resource type computes its
//! physical ID and attributes.

use sitestack_core::Environment;

use crate::error::{TemplateError, TemplateResult};
use crate::expr::{Expr, pseudo, sub_placeholders};
use crate::template::{Resource, Template};

/// Values of the pseudo parameters for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    /// `AWS::AccountId`.
    pub account: String,
    /// `AWS::Region`.
    pub region: String,
    /// `AWS::Partition`.
    pub partition: String,
    /// `AWS::URLSuffix`.
    pub url_suffix: String,
    /// `AWS::StackName`.
    pub stack_name: String,
}

impl DeployContext {
    /// Build a context from a concrete environment.
    ///
    /// Returns `None` unless both account and region are pinned.
    #[must_use]
    pub fn from_environment(env: &Environment, stack_name: impl Into<String>) -> Option<Self> {
        let (account, region) = (env.account.as_ref()?, env.region.as_ref()?);
        Some(Self {
            account: account.as_str().to_owned(),
            region: region.as_str().to_owned(),
            partition: region.partition().to_owned(),
            url_suffix: region.url_suffix().to_owned(),
            stack_name: stack_name.into(),
        })
    }

    fn pseudo(&self, name: &str) -> Option<&str> {
        match name {
            pseudo::ACCOUNT_ID => Some(&self.account),
            pseudo::REGION => Some(&self.region),
            pseudo::PARTITION => Some(&self.partition),
            pseudo::URL_SUFFIX => Some(&self.url_suffix),
            pseudo::STACK_NAME => Some(&self.stack_name),
            _ => None,
        }
    }
}

/// A resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A scalar, rendered as a string.
    Str(String),
    /// A list of scalars.
    List(Vec<String>),
}

impl Resolved {
    /// The scalar value, or `None` for a list.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::List(_) => None,
        }
    }

    fn into_string(self, function: &'static str) -> TemplateResult<String> {
        match self {
            Self::Str(s) => Ok(s),
            Self::List(_) => Err(TemplateError::InvalidArguments {
                function,
                reason: "expected a string, got a list".to_owned(),
            }),
        }
    }
}

/// Knows how a resource type exposes its physical ID and attributes.
pub trait AttributeResolver {
    /// The value of `{"Ref": logical_id}` for this resource, if predictable.
    ///
    /// `props` resolves any of the resource's own properties.
    fn physical_id(
        &self,
        resource: &Resource,
        props: &dyn Fn(&str) -> TemplateResult<Option<String>>,
        ctx: &DeployContext,
    ) -> Option<String>;

    /// The value of `{"Fn::GetAtt": [logical_id, attribute]}`, if predictable.
    fn attribute(
        &self,
        resource: &Resource,
        physical_id: Option<&str>,
        attribute: &str,
        ctx: &DeployContext,
    ) -> Option<String>;
}

/// Evaluates expressions against a template, a context, and an attribute resolver.
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    template: &'a Template,
    ctx: &'a DeployContext,
    attributes: &'a dyn AttributeResolver,
}

impl std::fmt::Debug for Evaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator.
    #[must_use]
    pub fn new(
        template: &'a Template,
        ctx: &'a DeployContext,
        attributes: &'a dyn AttributeResolver,
    ) -> Self {
        Self {
            template,
            ctx,
            attributes,
        }
    }

    /// Evaluate an expression.
    ///
    /// # Errors
    /// Returns [`TemplateError::Unresolvable`] when the value depends on
    /// something only the engine knows, or
    /// [`TemplateError::InvalidArguments`] for malformed intrinsics.
    pub fn eval(&self, expr: &Expr) -> TemplateResult<Resolved> {
        match expr {
            Expr::Str(s) => Ok(Resolved::Str(s.clone())),
            Expr::Bool(b) => Ok(Resolved::Str(b.to_string())),
            Expr::Int(n) => Ok(Resolved::Str(n.to_string())),
            Expr::List(items) => items
                .iter()
                .map(|i| self.eval(i).and_then(|r| r.into_string("list")))
                .collect::<TemplateResult<Vec<_>>>()
                .map(Resolved::List),
            Expr::Map(_) => Err(TemplateError::Unresolvable("a map value".to_owned())),
            Expr::Ref(name) => self.reference(name).map(Resolved::Str),
            Expr::GetAtt {
                resource,
                attribute,
            } => self.get_att(resource, attribute).map(Resolved::Str),
            Expr::Join { delimiter, parts } => parts
                .iter()
                .map(|p| self.eval(p).and_then(|r| r.into_string("Fn::Join")))
                .collect::<TemplateResult<Vec<_>>>()
                .map(|parts| Resolved::Str(parts.join(delimiter))),
            Expr::Select { index, list } => match self.eval(list)? {
                Resolved::List(items) => {
                    let len = items.len();
                    items.into_iter().nth(*index).map(Resolved::Str).ok_or_else(|| {
                        TemplateError::InvalidArguments {
                            function: "Fn::Select",
                            reason: format!("index {index} out of bounds for list of {len}"),
                        }
                    })
                }
                Resolved::Str(_) => Err(TemplateError::InvalidArguments {
                    function: "Fn::Select",
                    reason: "expected a list".to_owned(),
                }),
            },
            Expr::Split { delimiter, source } => {
                let source = self.eval(source)?.into_string("Fn::Split")?;
                Ok(Resolved::List(
                    source.split(delimiter.as_str()).map(str::to_owned).collect(),
                ))
            }
            Expr::Sub(template) => self.sub(template).map(Resolved::Str),
            Expr::Fn { name, .. } => Err(TemplateError::Unresolvable((*name).to_owned())),
        }
    }

    fn reference(&self, name: &str) -> TemplateResult<String> {
        if let Some(v) = self.ctx.pseudo(name) {
            return Ok(v.to_owned());
        }
        self.physical_id(name)?
            .ok_or_else(|| TemplateError::Unresolvable(format!("Ref {name}")))
    }

    fn physical_id(&self, logical_id: &str) -> TemplateResult<Option<String>> {
        let resource = self
            .template
            .resource(logical_id)
            .ok_or_else(|| TemplateError::Unresolvable(format!("Ref {logical_id}")))?;
        let props = |prop: &str| -> TemplateResult<Option<String>> {
            resource
                .properties
                .get(prop)
                .map(|e| self.eval(e).and_then(|r| r.into_string("Ref")))
                .transpose()
        };
        Ok(self.attributes.physical_id(resource, &props, self.ctx))
    }

    fn get_att(&self, logical_id: &str, attribute: &str) -> TemplateResult<String> {
        let resource = self.template.resource(logical_id).ok_or_else(|| {
            TemplateError::Unresolvable(format!("Fn::GetAtt {logical_id}.{attribute}"))
        })?;
        let physical_id = self.physical_id(logical_id)?;
        self.attributes
            .attribute(resource, physical_id.as_deref(), attribute, self.ctx)
            .ok_or_else(|| {
                TemplateError::Unresolvable(format!("Fn::GetAtt {logical_id}.{attribute}"))
            })
    }

    fn sub(&self, template: &str) -> TemplateResult<String> {
        let mut out = template.to_owned();
        for placeholder in sub_placeholders(template) {
            let value = match placeholder.split_once('.') {
                Some((id, attr)) if !pseudo::is_pseudo(placeholder) => self.get_att(id, attr)?,
                _ => self.reference(placeholder)?,
            };
            out = out.replace(&format!("${{{placeholder}}}"), &value);
        }
        Ok(out.replace("${!", "${"))
    }
}

impl Template {
    /// Evaluate a named output for a concrete deployment.
    ///
    /// # Errors
    /// Returns [`TemplateError::NoSuchOutput`] for an unknown name, or any
    /// evaluation error from [`Evaluator::eval`].
    pub fn resolve_output(
        &self,
        name: &str,
        ctx: &DeployContext,
        attributes: &dyn AttributeResolver,
    ) -> TemplateResult<Resolved> {
        let output = self
            .outputs
            .get(name)
            .ok_or_else(|| TemplateError::NoSuchOutput(name.to_owned()))?;
        Evaluator::new(self, ctx, attributes).eval(&output.value)
    }
}
