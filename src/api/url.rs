use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use tracing::{debug, info};

use super::{CONTEXT_ROOT, ContentApi, ContentType};
use crate::errors::Error;
use crate::transport::RestCallArgs;

const DEFAULT_SERVER: &str = "http://localhost";
const GRAPHQL_LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

static DIGITAL_ASSET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^DigitalAsset_").expect("static regex"));

/// How a rendition request names its asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetRef<'a> {
    Id(&'a str),
    Slug(&'a str),
}

impl ContentApi {
    /// `{server}/content/{state}/api/{version}`
    pub fn create_prefix(&self, args: &RestCallArgs) -> String {
        format!(
            "{}{}/{}/api/{}",
            args.content_server,
            CONTEXT_ROOT,
            args.content_type.server_state(),
            self.version.as_str()
        )
    }

    /// Search string, channel token and cache buster, `&`-joined where non-empty.
    pub fn create_suffix(&self, args: &RestCallArgs) -> String {
        let token = args
            .channel_token()
            .map(|t| format!("{}={}", self.properties().token_name, t));
        let cache_buster = args.cache_buster_value().map(|cb| format!("cb={}", cb));

        [Some(args.search.clone()), token, cache_buster]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn format_url(&self, path: &str, args: &RestCallArgs) -> String {
        let suffix = self.create_suffix(args);
        let mut url = self.create_prefix(args);
        url.push_str(path);
        if !suffix.is_empty() {
            url.push(if path.contains('?') { '&' } else { '?' });
            url.push_str(&suffix);
        }
        debug!(url = %url, "formatted content URL");
        url
    }

    /// Whether an id names a digital asset rather than a documents-service file.
    pub fn is_digital_asset(&self, id: &str) -> bool {
        DIGITAL_ASSET_PREFIX.is_match(id)
            || (id.len() == 36 && (id.starts_with("CONT") || id.starts_with("CORE")))
    }

    /// URL for a named rendition.
    ///
    /// Ids that do not look like digital assets are served from the documents
    /// service instead. Yields an empty string when nothing identifies the asset.
    pub fn rendition_url(
        &self,
        asset: Option<AssetRef<'_>>,
        rendition: Option<&str>,
        args: &RestCallArgs,
    ) -> String {
        let url = match asset {
            None => String::new(),
            Some(AssetRef::Id(id)) if id.is_empty() => String::new(),
            Some(AssetRef::Slug(slug)) if slug.is_empty() => String::new(),
            Some(AssetRef::Id(id)) if !self.is_digital_asset(id) => {
                format!("{}/documents/file/{}", args.content_server, id)
            }
            Some(asset) => self.asset_rendition_url(asset, rendition, args),
        };
        info!(url = %url, "rendition URL");
        url
    }

    /// Rendition URL under the digital-assets path, without the documents fallback.
    pub fn asset_rendition_url(
        &self,
        asset: AssetRef<'_>,
        rendition: Option<&str>,
        args: &RestCallArgs,
    ) -> String {
        let properties = self.properties();
        let segment = if args.secure_content {
            properties.secure_asset_url_name
        } else {
            properties.asset_url_name
        };
        let identifier = match asset {
            AssetRef::Id(id) => id.to_string(),
            AssetRef::Slug(slug) => format!(".by.slug/{}", slug),
        };
        let rendition = rendition
            .filter(|r| !r.is_empty())
            .unwrap_or(properties.digital_asset_default);

        let mut params = Vec::new();
        if let Some(cb) = args.cache_buster_value() {
            params.push(format!("cb={}", cb));
        }
        if let Some(format) = args.format.as_deref().filter(|f| !f.is_empty()) {
            params.push(format!("format={}", format));
        }
        if let Some(download) = args.download {
            params.push(format!("download={}", download));
        }
        if args.content_type == ContentType::Published {
            if let Some(token) = args.channel_token() {
                params.push(format!("{}={}", properties.token_name, token));
            }
        }

        let mut url = format!(
            "{}/{}/{}/{}",
            self.create_prefix(args),
            segment,
            identifier,
            rendition
        );
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// The GraphQL endpoint, fixed at v1.1 whatever version the client speaks.
    ///
    /// Only published and preview content are served; draft targets published.
    pub fn format_graphql_url(&self, args: &RestCallArgs) -> String {
        let mut params = Vec::new();
        if let Some(cb) = args.cache_buster.as_ref().filter(|cb| cb.is_structured()) {
            params.push(format!(
                "cb={}",
                urlencoding::encode(cb.content_key().unwrap_or_default())
            ));
        }
        if GRAPHQL_LOCAL_HOSTS
            .iter()
            .any(|host| args.content_server.contains(host))
        {
            params.push(format!(
                "channelToken={}",
                urlencoding::encode(args.channel_token.as_deref().unwrap_or_default())
            ));
        }
        let state = match args.content_type {
            ContentType::Preview => "preview",
            _ => "published",
        };
        format!(
            "{}{}/{}/api/v1.1/graphql?{}",
            args.content_server,
            CONTEXT_ROOT,
            state,
            params.join("&")
        )
    }
}

/// Reduce a configured server URL to `scheme://host[:port]`.
///
/// Falls back to `http://localhost` when unset; a bare host is taken as https.
pub fn extract_server(content_server: Option<&str>) -> Result<String, Error> {
    let raw = content_server
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SERVER);
    let candidate = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&candidate).map_err(|e| {
        Error::Config(format!("Invalid content server URL '{}': {}", candidate, e))
    })?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::Config(format!("Content server URL '{}' has no host", candidate)))?;
    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::config::{CacheBuster, CacheBusterKeys};

    fn args(content_type: ContentType) -> RestCallArgs {
        RestCallArgs::new(Method::GET, "https://cms.example.com", content_type)
    }

    #[test]
    fn suffix_joins_only_present_parts() {
        let api = ContentApi::v1_1();
        let mut call = args(ContentType::Published);
        assert_eq!(api.create_suffix(&call), "");

        call.cache_buster = Some(CacheBuster::Key("42".into()));
        assert_eq!(api.create_suffix(&call), "cb=42");

        call.channel_token = Some("tok".into());
        call.search = "fields=all".into();
        assert_eq!(api.create_suffix(&call), "fields=all&channelToken=tok&cb=42");

        assert_eq!(
            ContentApi::v1().create_suffix(&call),
            "fields=all&access-token=tok&cb=42"
        );
    }

    #[test]
    fn format_url_picks_separator_from_path() {
        let api = ContentApi::v1_1();
        let mut call = args(ContentType::Draft);
        assert_eq!(
            api.format_url("/items/X", &call),
            "https://cms.example.com/content/management/api/v1.1/items/X"
        );

        call.channel_token = Some("tok".into());
        assert_eq!(
            api.format_url("/items/X", &call),
            "https://cms.example.com/content/management/api/v1.1/items/X?channelToken=tok"
        );
        assert_eq!(
            api.format_url("/items?q=x", &call),
            "https://cms.example.com/content/management/api/v1.1/items?q=x&channelToken=tok"
        );
    }

    #[test]
    fn digital_asset_heuristic() {
        let api = ContentApi::v1_1();
        assert!(api.is_digital_asset("DigitalAsset_abc"));
        assert!(api.is_digital_asset("digitalasset_abc"));
        assert!(api.is_digital_asset("CONTAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1"));
        assert!(!api.is_digital_asset("CONTABC123"));
        assert!(!api.is_digital_asset("DOC123"));
    }

    #[test]
    fn rendition_url_for_published_asset() {
        let api = ContentApi::v1_1();
        let mut call = args(ContentType::Published);
        call.channel_token = Some("tok".into());
        call.cache_buster = Some(CacheBuster::Key("7".into()));
        call.format = Some("jpg".into());
        call.download = Some(false);
        let id = "CONTAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1";
        assert_eq!(
            api.rendition_url(Some(AssetRef::Id(id)), Some("Thumbnail"), &call),
            format!(
                "https://cms.example.com/content/published/api/v1.1/assets/{}/Thumbnail?cb=7&format=jpg&download=false&channelToken=tok",
                id
            )
        );
    }

    #[test]
    fn rendition_url_fallbacks() {
        let api = ContentApi::v1_1();
        let mut call = args(ContentType::Draft);
        call.channel_token = Some("tok".into());
        assert_eq!(
            api.rendition_url(Some(AssetRef::Slug("banner")), None, &call),
            "https://cms.example.com/content/management/api/v1.1/assets/.by.slug/banner/native"
        );
        assert_eq!(
            api.rendition_url(Some(AssetRef::Id("DOC1")), None, &call),
            "https://cms.example.com/documents/file/DOC1"
        );
        assert_eq!(api.rendition_url(None, None, &call), "");
    }

    #[test]
    fn v1_renditions_use_legacy_names() {
        let api = ContentApi::v1();
        let mut call = args(ContentType::Draft);
        call.secure_content = true;
        assert_eq!(
            api.asset_rendition_url(AssetRef::Id("X"), None, &call),
            "https://cms.example.com/content/management/api/v1/secure-digital-assets/X/default"
        );
    }

    #[test]
    fn graphql_url_is_version_independent() {
        let api = ContentApi::v1();
        let mut call = args(ContentType::Published);
        call.channel_token = Some("tok".into());
        call.cache_buster = Some(CacheBuster::Key("9".into()));
        assert_eq!(
            api.format_graphql_url(&call),
            "https://cms.example.com/content/published/api/v1.1/graphql?"
        );

        call.content_server = "http://localhost:8080".into();
        call.content_type = ContentType::Preview;
        call.cache_buster = Some(CacheBuster::Keys(CacheBusterKeys {
            content_key: Some("C1".into()),
            ..CacheBusterKeys::default()
        }));
        assert_eq!(
            api.format_graphql_url(&call),
            "http://localhost:8080/content/preview/api/v1.1/graphql?cb=C1&channelToken=tok"
        );
    }

    #[test]
    fn server_is_reduced_to_origin() {
        assert_eq!(extract_server(None).unwrap(), "http://localhost");
        assert_eq!(
            extract_server(Some("https://cms.example.com/site/home?x=1")).unwrap(),
            "https://cms.example.com"
        );
        assert_eq!(
            extract_server(Some("http://127.0.0.1:8080/")).unwrap(),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            extract_server(Some("cms.example.com")).unwrap(),
            "https://cms.example.com"
        );
        assert!(matches!(
            extract_server(Some("http://")),
            Err(Error::Config(_))
        ));
    }
}
