use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{is_truthy, value_text};

/// Characters left untouched by `encodeURI`-style encoding.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// Keys consumed by the client itself; never forwarded as query parameters.
pub const RESERVED_KEYS: [&str; 13] = [
    "id",
    "ID",
    "itemGUID",
    "ids",
    "IDs",
    "itemGUIDs",
    "slug",
    "timeout",
    "search",
    "types",
    "beforeSend",
    "contentType",
    "language",
];

/// Percent-encode everything outside the URI reserved and unreserved sets.
pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

/// One `orderBy` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl OrderBy {
    pub fn new(name: impl Into<String>, order: Option<&str>) -> Self {
        Self {
            name: name.into(),
            order: order.map(str::to_owned),
        }
    }
}

/// Free-form, insertion-ordered query arguments passed through to the REST API.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Value)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// SCIM filter expression.
    pub fn q(self, query: impl Into<String>) -> Self {
        self.set("q", query.into())
    }

    pub fn fields(self, fields: impl Into<String>) -> Self {
        self.set("fields", fields.into())
    }

    pub fn limit(self, limit: u64) -> Self {
        self.set("limit", limit)
    }

    pub fn offset(self, offset: u64) -> Self {
        self.set("offset", offset)
    }

    pub fn expand(self, expand: impl Into<String>) -> Self {
        self.set("expand", expand.into())
    }

    pub fn item_depth(self, depth: u64) -> Self {
        self.set("itemDepth", depth)
    }

    /// Asset version; expressed in the URL path rather than the query string.
    pub fn version(self, version: impl Into<String>) -> Self {
        self.set("version", version.into())
    }

    pub fn order_by(self, entries: Vec<OrderBy>) -> Self {
        let value = serde_json::to_value(entries).unwrap_or(Value::Null);
        self.set("orderBy", value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<Map<String, Value>> for QueryParams {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Normalized query data for one REST call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchParams {
    pub method: Method,
    /// Serialized query string, without a leading `?`.
    pub get_data: String,
    pub post_data: Value,
    pub asset_version: Option<String>,
    /// Set when `itemDepth` or `expand` was supplied; holds the value used for `expand=`.
    pub use_aggregate: Option<String>,
}

/// Convert call arguments into a query string and side-channel values.
///
/// Unknown or malformed entries are dropped silently: reserved keys, keys
/// that are not already URI-safe, and non-scalar values other than a
/// single-entry `orderBy`.
pub fn build_search_params(params: &QueryParams, search: Option<&str>) -> SearchParams {
    let mut parameters = String::new();
    let mut separator = "";
    let mut asset_version = None;

    for (property, value) in params.iter() {
        if RESERVED_KEYS.contains(&property) || encode_uri(property) != property {
            continue;
        }
        if property == "expand" {
            continue;
        }
        if property == "version" {
            if is_truthy(value) {
                asset_version = Some(value_text(value));
            }
            continue;
        }

        let collapsed = if property == "orderBy" {
            collapse_order_by(value)
        } else {
            None
        };
        let Some(text) = scalar_text(collapsed.as_ref().unwrap_or(value)) else {
            continue;
        };
        parameters.push_str(separator);
        parameters.push_str(property);
        parameters.push('=');
        parameters.push_str(&encode_uri(&text));
        separator = "&";
    }

    if let Some(search) = search.filter(|s| !s.is_empty()) {
        parameters.push_str(separator);
        parameters.push_str(search);
    }

    let use_aggregate = match (params.get("itemDepth"), params.get("expand")) {
        (Some(depth), _) if is_truthy(depth) => Some(value_text(depth)),
        (_, Some(expand)) => Some(value_text(expand)),
        (Some(depth), None) => Some(value_text(depth)),
        (None, None) => None,
    };

    SearchParams {
        method: Method::GET,
        get_data: parameters,
        post_data: Value::Object(Map::new()),
        asset_version,
        use_aggregate,
    }
}

/// `[{name, order}]` becomes `"name:order"`. Only single-entry arrays are supported.
fn collapse_order_by(value: &Value) -> Option<Value> {
    let [entry] = value.as_array()?.as_slice() else {
        return None;
    };
    let name = entry.get("name").and_then(scalar_text)?;
    let order = entry
        .get("order")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .unwrap_or_default();
    let collapsed = match order.as_str() {
        "" => name,
        "des" => format!("{}:desc", name),
        other => format!("{}:{}", name, other),
    };
    Some(Value::String(collapsed))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
