//! Recognition of post links.

use url::Url;

use crate::error::{Error, Result};

/// Hosts that serve post pages under `/<user>/status/<id>`.
pub const SUPPORTED_DOMAINS: [&str; 7] = [
    "x.com",
    "twitter.com",
    "mobile.twitter.com",
    "fxtwitter.com",
    "fixupx.com",
    "vxtwitter.com",
    "nitter.net",
];

/// The parts of a post link the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUrl {
    /// First path segment; `i` for author-less links
    pub screen_name: String,
    pub post_id: String,
}

/// Parses a post link from any supported host.
///
/// The scheme is optional, `www.` is ignored, and so are query and fragment.
pub fn parse_post_url(raw: &str) -> Result<PostUrl> {
    let raw = raw.trim();
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|_| Error::InvalidUrl(raw.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(raw.to_string()))?
        .to_ascii_lowercase();
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if !SUPPORTED_DOMAINS.contains(&domain) {
        return Err(Error::UnsupportedDomain {
            domain: domain.to_string(),
            supported: SUPPORTED_DOMAINS.join(", "),
        });
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [user, marker, id, ..]
            if matches!(*marker, "status" | "statuses")
                && !id.is_empty()
                && id.chars().all(|c| c.is_ascii_digit()) =>
        {
            Ok(PostUrl {
                screen_name: user.to_string(),
                post_id: id.to_string(),
            })
        }
        _ => Err(Error::InvalidUrl(raw.to_string())),
    }
}
