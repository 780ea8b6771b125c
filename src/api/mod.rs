//! URL and query construction for the content REST API.

mod coerce;
mod paths;
pub mod query;
mod url;
pub mod version;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use paths::{BulkItemsPath, ItemListPath, ItemPath, RecommendationPath};
pub use query::{OrderBy, QueryParams, SearchParams, build_search_params, encode_uri};
pub use url::{AssetRef, extract_server};
pub use version::{ApiProperties, ContentVersion, DEFAULT_VERSION};

use crate::errors::Error;

pub const CONTEXT_ROOT: &str = "/content";

/// Which content state a call targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Published,
    Draft,
    Preview,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Published => "published",
            ContentType::Draft => "draft",
            ContentType::Preview => "preview",
        }
    }

    /// Path segment used by the server for this content type.
    pub fn server_state(self) -> &'static str {
        match self {
            ContentType::Published => "published",
            ContentType::Draft => "management",
            ContentType::Preview => "preview",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "published" => Ok(ContentType::Published),
            "draft" => Ok(ContentType::Draft),
            "preview" => Ok(ContentType::Preview),
            other => Err(Error::InvalidArgument(format!(
                "unknown content type '{}'; expected published, draft or preview",
                other
            ))),
        }
    }
}

/// Version-specific path grammar, fixed for a client's lifetime.
///
/// `version` selects how paths are built. `requested` is set when the caller
/// asked for the older v1 response shape while paths use v1.1; responses are
/// then coerced back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentApi {
    version: ContentVersion,
    requested: Option<ContentVersion>,
}

impl ContentApi {
    /// Negotiate the version requested at client creation.
    ///
    /// A v1 request is served by the v1.1 API with v1 response coercion.
    pub fn create(requested: Option<&str>) -> Self {
        match version::negotiate("content client", requested) {
            ContentVersion::V1 => Self {
                version: ContentVersion::V1_1,
                requested: Some(ContentVersion::V1),
            },
            ContentVersion::V1_1 => Self::v1_1(),
        }
    }

    /// Address the legacy v1 URL grammar directly.
    pub fn v1() -> Self {
        Self {
            version: ContentVersion::V1,
            requested: None,
        }
    }

    pub fn v1_1() -> Self {
        Self {
            version: ContentVersion::V1_1,
            requested: None,
        }
    }

    pub fn version(&self) -> ContentVersion {
        self.version
    }

    pub fn requested_version(&self) -> Option<ContentVersion> {
        self.requested
    }

    /// The version reported to callers through client info.
    pub fn reported_version(&self) -> ContentVersion {
        self.requested.unwrap_or(self.version)
    }

    pub fn properties(&self) -> ApiProperties {
        self.version.properties()
    }
}

/// Loose truthiness used for optional scalar arguments.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a value as it appears when spliced into a URL.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_maps_to_server_state() {
        assert_eq!(ContentType::Published.server_state(), "published");
        assert_eq!(ContentType::Draft.server_state(), "management");
        assert_eq!(ContentType::Preview.server_state(), "preview");
    }

    #[test]
    fn v1_request_uses_v1_1_paths_with_coercion() {
        let api = ContentApi::create(Some("v1"));
        assert_eq!(api.version(), ContentVersion::V1_1);
        assert_eq!(api.requested_version(), Some(ContentVersion::V1));
        assert_eq!(api.reported_version(), ContentVersion::V1);

        let api = ContentApi::create(Some("1.1"));
        assert_eq!(api.version(), ContentVersion::V1_1);
        assert_eq!(api.requested_version(), None);
    }

    #[test]
    fn content_type_parses_case_insensitively() {
        assert_eq!("Draft".parse::<ContentType>().unwrap(), ContentType::Draft);
        assert!("bogus".parse::<ContentType>().is_err());
    }
}
