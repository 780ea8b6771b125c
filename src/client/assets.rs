use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use reqwest::Method;
use serde_json::Value;
use tracing::trace;

use crate::api::{AssetRef, QueryParams};

use super::{CallOptions, ContentClient, RenditionRequest};

static DIGITAL_ASSET_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!--\$CEC_DIGITAL_ASSET--\]*(.*?) *\[/!--\$CEC_DIGITAL_ASSET--\]")
        .expect("static regex")
});

static PAGE_LINK_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!--\$SCS_PAGE--\]*(.*?) *\[/!--\$SCS_PAGE--\]").expect("static regex")
});

const PAGE_LINK_FALLBACK: &str = "#";

/// Resolves `[!--$SCS_PAGE--]` references to page URLs.
pub trait PageLinkResolver: Send + Sync {
    fn page_link(&self, page: &str) -> Option<String>;
}

impl<F> PageLinkResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn page_link(&self, page: &str) -> Option<String> {
        self(page)
    }
}

impl ContentClient {
    /// URL of an asset rendition.
    ///
    /// In compiler mode this is a digital-asset macro for the compiler to expand.
    pub fn get_rendition_url(&self, req: &RenditionRequest) -> String {
        if self.compiler_mode {
            return format!(
                "[!--$SCS_DIGITAL_ASSET--]{}[/!--$SCS_DIGITAL_ASSET--]",
                req.id.as_deref().unwrap_or_default()
            );
        }
        let mut args = self.resolve_rest_args(Method::GET, &QueryParams::new(), &req.options);
        args.format = req.format.clone();
        args.download = req.download;

        let asset = match (req.id.as_deref(), req.slug.as_deref()) {
            (Some(id), _) if !id.is_empty() => Some(AssetRef::Id(id)),
            (_, Some(slug)) if !slug.is_empty() => Some(AssetRef::Slug(slug)),
            _ => None,
        };
        self.api
            .rendition_url(asset, req.rendition.as_deref(), &args)
    }

    /// Replace digital-asset and page-link macros in `value`.
    ///
    /// A no-op in compiler mode.
    pub fn expand_macros(&self, value: &str) -> String {
        trace!("expand_macros: before: {}", value);
        if self.compiler_mode {
            return value.to_string();
        }
        let expanded = self.expand_page_links(&self.expand_digital_assets(value)).into_owned();
        trace!("expand_macros: after: {}", expanded);
        expanded
    }

    /// [`expand_macros`](Self::expand_macros) applied to every string in a JSON value.
    pub fn expand_macros_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.expand_macros(&s)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.expand_macros_value(item))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.expand_macros_value(v)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn expand_digital_assets<'a>(&self, value: &'a str) -> Cow<'a, str> {
        DIGITAL_ASSET_MACRO.replace_all(value, |caps: &Captures<'_>| {
            let (id, download) = parse_asset_macro(&caps[1]);
            let mut args =
                self.resolve_rest_args(Method::GET, &QueryParams::new(), &CallOptions::default());
            args.download = Some(download);
            self.api.asset_rendition_url(AssetRef::Id(id), None, &args)
        })
    }

    fn expand_page_links<'a>(&self, value: &'a str) -> Cow<'a, str> {
        PAGE_LINK_MACRO.replace_all(value, |caps: &Captures<'_>| {
            self.page_links
                .as_ref()
                .and_then(|resolver| resolver.page_link(&caps[1]))
                .filter(|href| !href.is_empty())
                .unwrap_or_else(|| PAGE_LINK_FALLBACK.to_string())
        })
    }
}

/// `id[,true]`: the optional flag selects download disposition.
fn parse_asset_macro(body: &str) -> (&str, bool) {
    let mut parts = body.split(',');
    let id = parts.next().unwrap_or_default();
    let download = parts.next() == Some("true");
    (id, download)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::{CacheBuster, ClientConfig};

    fn client() -> ContentClient {
        let cfg = ClientConfig::new("https://cms.example.com")
            .with_channel_token("tok")
            .with_cache_buster(CacheBuster::Key("5".into()));
        ContentClient::delivery(&cfg).unwrap()
    }

    #[test]
    fn asset_macro_expands_with_download_flag() {
        let out = client().expand_macros(
            "<a href=\"[!--$CEC_DIGITAL_ASSET--]CONTABC123,true[/!--$CEC_DIGITAL_ASSET--]\">",
        );
        assert_eq!(
            out,
            "<a href=\"https://cms.example.com/content/published/api/v1.1/assets/CONTABC123/native?cb=5&download=true&channelToken=tok\">"
        );
    }

    #[test]
    fn plain_asset_macro_is_inline() {
        let out = client()
            .expand_macros("[!--$CEC_DIGITAL_ASSET--]CONT1[/!--$CEC_DIGITAL_ASSET--]");
        assert!(out.ends_with("/assets/CONT1/native?cb=5&download=false&channelToken=tok"));
    }

    #[test]
    fn page_links_use_resolver_or_hash() {
        let text = "see [!--$SCS_PAGE--]42[/!--$SCS_PAGE--]";
        assert_eq!(client().expand_macros(text), "see #");

        let resolver = |page: &str| Some(format!("/pages/{}", page));
        let resolved = client().with_page_link_resolver(Arc::new(resolver));
        assert_eq!(resolved.expand_macros(text), "see /pages/42");
    }

    #[test]
    fn compiler_mode_leaves_macros_and_encodes_renditions() {
        let compiler = client().with_compiler_mode(true);
        let text = "[!--$CEC_DIGITAL_ASSET--]CONT1[/!--$CEC_DIGITAL_ASSET--]";
        assert_eq!(compiler.expand_macros(text), text);
        assert_eq!(
            compiler.get_rendition_url(&RenditionRequest::by_id("CONT1")),
            "[!--$SCS_DIGITAL_ASSET--]CONT1[/!--$SCS_DIGITAL_ASSET--]"
        );
    }

    #[test]
    fn json_values_expand_recursively() {
        let out = client().expand_macros_value(json!({
            "body": "[!--$SCS_PAGE--]1[/!--$SCS_PAGE--]",
            "list": ["[!--$SCS_PAGE--]2[/!--$SCS_PAGE--]", 3],
            "n": null
        }));
        assert_eq!(out, json!({"body": "#", "list": ["#", 3], "n": null}));
    }

    #[test]
    fn rendition_url_requires_an_identifier() {
        assert_eq!(client().get_rendition_url(&RenditionRequest::default()), "");
        assert_eq!(
            client().get_rendition_url(&RenditionRequest::by_id("DOC9")),
            "https://cms.example.com/documents/file/DOC9"
        );
    }
}
