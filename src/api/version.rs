use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// REST API versions this client can address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentVersion {
    V1,
    V1_1,
}

/// Used when the caller asks for nothing, or for something unsupported.
pub const DEFAULT_VERSION: ContentVersion = ContentVersion::V1_1;

const SUPPORTED_VERSIONS: [(&str, ContentVersion); 2] = [
    ("1.0.0", ContentVersion::V1),
    ("1.1.0", ContentVersion::V1_1),
];

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*((([<>]?=?)\s*(v)?([0-9]+)(\.([0-9]+))?(\.([0-9]+))?))\s*")
        .expect("version pattern compiles")
});

/// Static naming that differs between API versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiProperties {
    /// Query parameter carrying the channel token.
    pub token_name: &'static str,
    pub digital_asset_default: &'static str,
    pub asset_url_name: &'static str,
    pub secure_asset_url_name: &'static str,
}

impl ContentVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentVersion::V1 => "v1",
            ContentVersion::V1_1 => "v1.1",
        }
    }

    pub fn properties(self) -> ApiProperties {
        match self {
            ContentVersion::V1 => ApiProperties {
                token_name: "access-token",
                digital_asset_default: "default",
                asset_url_name: "digital-assets",
                secure_asset_url_name: "secure-digital-assets",
            },
            ContentVersion::V1_1 => ApiProperties {
                token_name: "channelToken",
                digital_asset_default: "native",
                asset_url_name: "assets",
                secure_asset_url_name: "assets",
            },
        }
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce a loose version request ("v1", "1.1", ">=1.1.0") to major.minor.patch.
pub fn semantic_version(requested: &str) -> String {
    let captures = VERSION_PATTERN.captures(requested);
    let part = |idx: usize| {
        captures
            .as_ref()
            .and_then(|c| c.get(idx))
            .map(|m| m.as_str())
            .unwrap_or("0")
    };
    format!("{}.{}.{}", part(5), part(7), part(9))
}

/// Match a requested version against the supported table, falling back to
/// [`DEFAULT_VERSION`] with a warning.
pub fn negotiate(caller: &str, requested: Option<&str>) -> ContentVersion {
    let semantic = semantic_version(requested.unwrap_or("0.0.0"));
    if let Some((_, version)) = SUPPORTED_VERSIONS.iter().find(|(s, _)| *s == semantic) {
        return *version;
    }

    warn!(
        caller,
        requested = requested.unwrap_or(""),
        default = %DEFAULT_VERSION,
        "unrecognized content version; use one of 1.0.0 (v1) or 1.1.0 (v1.1)"
    );
    DEFAULT_VERSION
}
