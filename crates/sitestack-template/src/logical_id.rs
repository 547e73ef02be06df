//! CDK-compatible logical ID generation.
//!
//! A construct path such as `["WebsiteBucket", "Resource"]` becomes a
//! stable logical ID like `WebsiteBucket75C24D94`: a human-readable prefix
//! followed by eight hex digits of the MD5 of the full path, so two
//! constructs with similar names never collide.

use md5::{Digest, Md5};

/// Path component dropped from both the readable part and the hash.
const HIDDEN_ID: &str = "Default";

/// Path component dropped from the readable part only.
const HIDDEN_FROM_HUMAN_ID: &str = "Resource";

/// Number of hex characters of the path hash appended to the ID.
const HASH_LEN: usize = 8;

/// Maximum length of the readable part.
const MAX_HUMAN_LEN: usize = 240;

/// Compute the logical ID for a construct path relative to its stack.
///
/// Single-component paths are returned (sanitized) without a hash suffix,
/// which is how top-level outputs keep their literal names.
///
/// # Examples
///
/// ```
/// use sitestack_template::logical_id;
///
/// assert_eq!(logical_id(&["WebsiteURL"]), "WebsiteURL");
/// let id = logical_id(&["WebsiteBucket", "Resource"]);
/// assert!(id.starts_with("WebsiteBucket"));
/// assert_eq!(id.len(), "WebsiteBucket".len() + 8);
/// ```
#[must_use]
pub fn logical_id(path: &[&str]) -> String {
    let components: Vec<&str> = path
        .iter()
        .copied()
        .filter(|c| *c != HIDDEN_ID)
        .collect();

    if let [single] = components.as_slice() {
        return sanitize(single);
    }

    let hash = path_hash(&components);
    let human: String = components
        .iter()
        .filter(|c| **c != HIDDEN_FROM_HUMAN_ID)
        .map(|c| sanitize(c))
        .collect::<String>()
        .chars()
        .take(MAX_HUMAN_LEN)
        .collect();

    format!("{human}{hash}")
}

/// Upper-case hex prefix of the MD5 of the `/`-joined path.
fn path_hash(components: &[&str]) -> String {
    let digest = Md5::digest(components.join("/").as_bytes());
    hex::encode_upper(digest)[..HASH_LEN].to_owned()
}

/// Keep only ASCII alphanumerics.
fn sanitize(component: &str) -> String {
    component
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
