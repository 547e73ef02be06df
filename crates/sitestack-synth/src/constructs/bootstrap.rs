//! Bootstrap version check.
//!
//! Deploying needs the bootstrap stack (assets bucket and roles) to be
//! recent enough. The template reads the installed version from SSM and a
//! rule rejects the change set before anything is touched when it is too old.

use sitestack_template::{Expr, Parameter, Rule, RuleAssertion, Template, TemplateResult};

use super::BOOTSTRAP_QUALIFIER;

/// Name of the version parameter.
pub const BOOTSTRAP_VERSION_PARAMETER: &str = "BootstrapVersion";

/// Name of the rule checking it.
pub const CHECK_BOOTSTRAP_VERSION_RULE: &str = "CheckBootstrapVersion";

/// Lowest bootstrap version the stack deploys against.
pub const MIN_BOOTSTRAP_VERSION: u32 = 6;

/// SSM parameter holding the installed bootstrap version.
#[must_use]
pub fn version_ssm_parameter() -> String {
    format!("/cdk-bootstrap/{BOOTSTRAP_QUALIFIER}/version")
}

/// Declare the version parameter and rule into `template`.
pub fn declare(template: &mut Template) -> TemplateResult<()> {
    template.add_parameter(
        BOOTSTRAP_VERSION_PARAMETER,
        Parameter {
            type_name: "AWS::SSM::Parameter::Value<String>".to_owned(),
            default: Some(version_ssm_parameter()),
            description: Some(
                "Version of the CDK Bootstrap resources in this environment, automatically \
                 retrieved from SSM Parameter Store. [cdk:skip]"
                    .to_owned(),
            ),
        },
    )?;

    let too_old = (1..MIN_BOOTSTRAP_VERSION)
        .map(|v| Expr::str(v.to_string()))
        .collect::<Vec<_>>();
    template.add_rule(
        CHECK_BOOTSTRAP_VERSION_RULE,
        Rule {
            assertions: vec![RuleAssertion {
                assert: Expr::func(
                    "Fn::Not",
                    Expr::list([Expr::func(
                        "Fn::Contains",
                        Expr::list([
                            Expr::List(too_old),
                            Expr::reference(BOOTSTRAP_VERSION_PARAMETER),
                        ]),
                    )]),
                ),
                assert_description: format!(
                    "CDK bootstrap stack version {MIN_BOOTSTRAP_VERSION} required. Please run \
                     'cdk bootstrap' with a recent version of the CDK CLI."
                ),
            }],
        },
    )
}
