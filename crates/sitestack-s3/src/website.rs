//! S3 static website endpoints.
//!
//! Buckets in the regions that predate 2014 are served from
//! `{bucket}.s3-website-{region}.amazonaws.com`; every newer region uses a
//! dot instead: `{bucket}.s3-website.{region}.amazonaws.com`.

/// Regions whose website endpoint uses the dash form.
const DASH_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "eu-west-1",
    "sa-east-1",
    "us-gov-west-1",
];

/// Hostname of the website endpoint for a bucket.
///
/// # Examples
///
/// ```
/// use sitestack_s3::website::website_domain;
///
/// assert_eq!(
///     website_domain("site", "us-east-1", "amazonaws.com"),
///     "site.s3-website-us-east-1.amazonaws.com"
/// );
/// assert_eq!(
///     website_domain("site", "eu-central-1", "amazonaws.com"),
///     "site.s3-website.eu-central-1.amazonaws.com"
/// );
/// ```
#[must_use]
pub fn website_domain(bucket: &str, region: &str, url_suffix: &str) -> String {
    let separator = if DASH_REGIONS.contains(&region) { '-' } else { '.' };
    format!("{bucket}.s3-website{separator}{region}.{url_suffix}")
}

/// URL of the website endpoint, as reported by the bucket's `WebsiteURL` attribute.
#[must_use]
pub fn website_url(bucket: &str, region: &str, url_suffix: &str) -> String {
    format!("http://{}", website_domain(bucket, region, url_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_use_dash_form_for_legacy_regions() {
        for region in ["us-east-1", "us-west-2", "eu-west-1", "ap-southeast-1"] {
            let domain = website_domain("b", region, "amazonaws.com");
            assert_eq!(domain, format!("b.s3-website-{region}.amazonaws.com"));
        }
    }

    #[test]
    fn test_should_use_dot_form_for_newer_regions() {
        assert_eq!(
            website_domain("b", "ap-south-1", "amazonaws.com"),
            "b.s3-website.ap-south-1.amazonaws.com"
        );
        assert_eq!(
            website_url("b", "cn-north-1", "amazonaws.com.cn"),
            "http://b.s3-website.cn-north-1.amazonaws.com.cn"
        );
    }
}
