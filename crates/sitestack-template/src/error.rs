//! Template construction and evaluation errors.

/// Errors raised while assembling, ordering, or evaluating a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Two resources, outputs, or parameters share one logical ID.
    #[error("duplicate logical ID: {0}")]
    DuplicateLogicalId(String),

    /// A resource refers to a logical ID that is not declared.
    #[error("resource {from} references unknown resource {to}")]
    UnknownReference {
        /// The referencing resource.
        from: String,
        /// The missing target.
        to: String,
    },

    /// The dependency graph contains a cycle.
    #[error("dependency cycle among resources: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    /// An output with this name does not exist.
    #[error("no such output: {0}")]
    NoSuchOutput(String),

    /// An expression cannot be evaluated before deployment.
    #[error("cannot resolve {0} before deployment")]
    Unresolvable(String),

    /// An intrinsic function received arguments of the wrong shape.
    #[error("invalid arguments to {function}: {reason}")]
    InvalidArguments {
        /// The intrinsic function name.
        function: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
