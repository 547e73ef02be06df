//! CloudFormation template model for SiteStack.
//!
//! Provides the [`Template`] document and its parts, the intrinsic-function
//! expression tree [`Expr`], CDK-compatible [`logical_id`] generation, the
//! dependency graph used to derive apply and teardown orders, and an
//! evaluator that previews output values for a concrete deploy context.

pub mod error;
pub mod expr;
pub mod graph;
pub mod logical_id;
pub mod resolve;
pub mod template;

pub use error::{TemplateError, TemplateResult};
pub use expr::{Expr, pseudo};
pub use logical_id::logical_id;
pub use resolve::{AttributeResolver, DeployContext, Evaluator, Resolved};
pub use template::{DeletionPolicy, Output, Parameter, Resource, Rule, RuleAssertion, Template};
