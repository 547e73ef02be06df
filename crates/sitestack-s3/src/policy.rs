//! IAM policy documents.
//!
//! Statements carry [`Expr`] values for principals and resources because the
//! ARNs they name usually come from other resources in the same template.

use sitestack_template::Expr;

/// IAM policy language version.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement principal.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    /// `{"AWS": "*"}`: anyone.
    Anyone,
    /// `{"AWS": <arn>}`.
    Aws(Expr),
    /// `{"Service": <name>}`.
    Service(String),
}

impl From<&Principal> for Expr {
    fn from(p: &Principal) -> Self {
        match p {
            Principal::Anyone => Expr::map([("AWS", Expr::str("*"))]),
            Principal::Aws(arn) => Expr::map([("AWS", arn.clone())]),
            Principal::Service(name) => Expr::map([("Service", Expr::str(name))]),
        }
    }
}

/// One `Allow` policy statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Grantee, for resource-based policies.
    pub principal: Option<Principal>,
    /// Actions, e.g. `s3:GetObject`.
    pub actions: Vec<String>,
    /// Resource ARNs; empty for trust policies.
    pub resources: Vec<Expr>,
}

impl Statement {
    /// An `Allow` statement for the given actions.
    #[must_use]
    pub fn allow<S: Into<String>>(actions: impl IntoIterator<Item = S>) -> Self {
        Self {
            principal: None,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: Vec::new(),
        }
    }

    /// Set the principal.
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Add resources.
    #[must_use]
    pub fn on(mut self, resources: impl IntoIterator<Item = Expr>) -> Self {
        self.resources.extend(resources);
        self
    }
}

/// Single values are rendered bare and multiple values as a list, matching
/// how IAM itself echoes policies back.
fn one_or_many(mut items: Vec<Expr>) -> Expr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Expr::List(items)
    }
}

impl From<&Statement> for Expr {
    fn from(s: &Statement) -> Self {
        let mut entries = vec![
            ("Effect", Expr::str("Allow")),
            (
                "Action",
                one_or_many(s.actions.iter().map(Expr::str).collect()),
            ),
        ];
        if let Some(principal) = &s.principal {
            entries.push(("Principal", principal.into()));
        }
        if !s.resources.is_empty() {
            entries.push(("Resource", one_or_many(s.resources.clone())));
        }
        Expr::map(entries)
    }
}

/// A policy document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyDocument {
    /// Statements, in order.
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// A document with the given statements.
    #[must_use]
    pub fn new(statements: impl IntoIterator<Item = Statement>) -> Self {
        Self {
            statements: statements.into_iter().collect(),
        }
    }

    /// Trust policy letting an AWS service assume a role.
    #[must_use]
    pub fn assume_role(service: &str) -> Self {
        Self::new([
            Statement::allow(["sts:AssumeRole"]).principal(Principal::Service(service.to_owned()))
        ])
    }
}

impl From<&PolicyDocument> for Expr {
    fn from(d: &PolicyDocument) -> Self {
        Expr::map([
            ("Statement", Expr::list(d.statements.iter().map(Expr::from))),
            ("Version", Expr::str(POLICY_VERSION)),
        ])
    }
}
