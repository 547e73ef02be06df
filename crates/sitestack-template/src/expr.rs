//! Template values and CloudFormation intrinsic functions.
//!
//! [`Expr`] is the value type for every resource property and output. It
//! serializes to the CloudFormation JSON form (`{"Ref": ...}`,
//! `{"Fn::GetAtt": [...]}` and so on).

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// Names of the CloudFormation pseudo parameters.
pub mod pseudo {
    /// The deploying account.
    pub const ACCOUNT_ID: &str = "AWS::AccountId";
    /// The deploying region.
    pub const REGION: &str = "AWS::Region";
    /// The partition (`aws`, `aws-cn`, ...).
    pub const PARTITION: &str = "AWS::Partition";
    /// The endpoint DNS suffix (`amazonaws.com`, ...).
    pub const URL_SUFFIX: &str = "AWS::URLSuffix";
    /// The stack name.
    pub const STACK_NAME: &str = "AWS::StackName";

    /// Whether `name` is a pseudo parameter rather than a logical ID.
    #[must_use]
    pub fn is_pseudo(name: &str) -> bool {
        name.starts_with("AWS::")
    }
}

/// A template value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal string.
    Str(String),
    /// A literal boolean.
    Bool(bool),
    /// A literal integer.
    Int(i64),
    /// A list of values.
    List(Vec<Expr>),
    /// A map of values, serialized with sorted keys.
    Map(BTreeMap<String, Expr>),
    /// `Ref` to a parameter, pseudo parameter, or resource.
    Ref(String),
    /// `Fn::GetAtt` of a resource attribute.
    GetAtt {
        /// Logical ID of the resource.
        resource: String,
        /// Attribute name.
        attribute: String,
    },
    /// `Fn::Join`.
    Join {
        /// Separator.
        delimiter: String,
        /// Joined parts.
        parts: Vec<Expr>,
    },
    /// `Fn::Select`.
    Select {
        /// Zero-based index.
        index: usize,
        /// Source list.
        list: Box<Expr>,
    },
    /// `Fn::Split`.
    Split {
        /// Separator.
        delimiter: String,
        /// Source string.
        source: Box<Expr>,
    },
    /// `Fn::Sub` with `${...}` placeholders.
    Sub(String),
    /// Any other intrinsic (`Fn::Not`, `Fn::Contains`, ...) passed through verbatim.
    Fn {
        /// Function name including the `Fn::` prefix.
        name: &'static str,
        /// Function arguments.
        args: Box<Expr>,
    },
}

impl Expr {
    /// A literal string.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// `{"Ref": name}`.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// `{"Fn::GetAtt": [resource, attribute]}`.
    #[must_use]
    pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// `{"Fn::Sub": template}`.
    #[must_use]
    pub fn sub(template: impl Into<String>) -> Self {
        Self::Sub(template.into())
    }

    /// A list of values.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// A map of values.
    #[must_use]
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// `Fn::Join`, folded to a literal when every part is a literal string.
    ///
    /// Adjacent literal parts are merged, so a join over a mix of literals
    /// and references stays as small as the engine allows.
    #[must_use]
    pub fn join(delimiter: impl Into<String>, parts: impl IntoIterator<Item = Expr>) -> Self {
        let delimiter = delimiter.into();
        let parts: Vec<Expr> = parts.into_iter().collect();

        if parts.iter().all(|p| p.as_str().is_some()) {
            let joined = parts
                .iter()
                .filter_map(Expr::as_str)
                .collect::<Vec<_>>()
                .join(&delimiter);
            return Self::Str(joined);
        }

        if !delimiter.is_empty() {
            return Self::Join { delimiter, parts };
        }

        let mut merged: Vec<Expr> = Vec::with_capacity(parts.len());
        for part in parts {
            if let (Self::Str(next), Some(Self::Str(prev))) = (&part, merged.last_mut()) {
                prev.push_str(next);
                continue;
            }
            merged.push(part);
        }
        Self::Join {
            delimiter,
            parts: merged,
        }
    }

    /// `{"Fn::Select": [index, list]}`.
    #[must_use]
    pub fn select(index: usize, list: Expr) -> Self {
        Self::Select {
            index,
            list: Box::new(list),
        }
    }

    /// `{"Fn::Split": [delimiter, source]}`.
    #[must_use]
    pub fn split(delimiter: impl Into<String>, source: Expr) -> Self {
        Self::Split {
            delimiter: delimiter.into(),
            source: Box::new(source),
        }
    }

    /// An arbitrary intrinsic function.
    #[must_use]
    pub fn func(name: &'static str, args: Expr) -> Self {
        Self::Fn {
            name,
            args: Box::new(args),
        }
    }

    /// The literal string value, if this is a literal string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Logical IDs of resources or parameters this value refers to.
    ///
    /// Pseudo parameters are excluded; `Fn::Sub` placeholders are included.
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<String>) {
        match self {
            Self::Str(_) | Self::Bool(_) | Self::Int(_) => {}
            Self::List(items) => items.iter().for_each(|i| i.collect_references(out)),
            Self::Map(entries) => entries.values().for_each(|v| v.collect_references(out)),
            Self::Ref(name) => {
                if !pseudo::is_pseudo(name) {
                    out.push(name.clone());
                }
            }
            Self::GetAtt { resource, .. } => out.push(resource.clone()),
            Self::Join { parts, .. } => parts.iter().for_each(|p| p.collect_references(out)),
            Self::Select { list, .. } => list.collect_references(out),
            Self::Split { source, .. } => source.collect_references(out),
            Self::Sub(template) => {
                for placeholder in sub_placeholders(template) {
                    let target = placeholder.split('.').next().unwrap_or(placeholder);
                    if !pseudo::is_pseudo(target) {
                        out.push(target.to_owned());
                    }
                }
            }
            Self::Fn { args, .. } => args.collect_references(out),
        }
    }

    /// Convert to the CloudFormation JSON representation.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => json!(n),
            Self::List(items) => Value::Array(items.iter().map(Expr::to_json).collect()),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Ref(name) => json!({ "Ref": name }),
            Self::GetAtt {
                resource,
                attribute,
            } => json!({ "Fn::GetAtt": [resource, attribute] }),
            Self::Join { delimiter, parts } => json!({
                "Fn::Join": [delimiter, parts.iter().map(Expr::to_json).collect::<Vec<_>>()]
            }),
            Self::Select { index, list } => json!({ "Fn::Select": [index, list.to_json()] }),
            Self::Split { delimiter, source } => {
                json!({ "Fn::Split": [delimiter, source.to_json()] })
            }
            Self::Sub(template) => json!({ "Fn::Sub": template }),
            Self::Fn { name, args } => {
                let mut obj = serde_json::Map::new();
                obj.insert((*name).to_owned(), args.to_json());
                Value::Object(obj)
            }
        }
    }
}

/// Iterate over the `${...}` placeholders of an `Fn::Sub` template.
///
/// `${!Literal}` escapes are skipped.
pub(crate) fn sub_placeholders(template: &str) -> impl Iterator<Item = &str> {
    template
        .split("${")
        .skip(1)
        .filter_map(|chunk| chunk.split_once('}').map(|(name, _)| name))
        .filter(|name| !name.starts_with('!'))
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl<T: Into<Expr>> From<Vec<T>> for Expr {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
