use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::ContentType;
use crate::config::Runtime;
use crate::errors::Error;

use super::{ContentClient, LayoutRequest, RenderItemRequest};

/// Layouts served from the site builder rather than the component catalog.
pub const SYSTEM_LAYOUTS: [&str; 2] = ["system-default-layout", "system-tile-layout"];

/// Content version assumed for layouts that do not declare one.
const DEFAULT_LAYOUT_VERSION: &str = "1.0.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Published,
    Draft,
    Preview,
    System,
}

impl LayoutType {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::Published => "published",
            LayoutType::Draft => "draft",
            LayoutType::Preview => "preview",
            LayoutType::System => "system",
        }
    }
}

impl From<ContentType> for LayoutType {
    fn from(ct: ContentType) -> Self {
        match ct {
            ContentType::Published => LayoutType::Published,
            ContentType::Draft => LayoutType::Draft,
            ContentType::Preview => LayoutType::Preview,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about a content layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutInfo {
    pub name: String,
    pub layout_factory: String,
    pub layout_type: LayoutType,
    pub require_path: String,
    pub content_version: String,
}

/// A loaded content layout.
#[async_trait]
pub trait ContentLayout: Send + Sync {
    /// Content API version the layout expects its data in.
    fn content_version(&self) -> Option<String> {
        None
    }

    async fn render(
        &self,
        client: &ContentClient,
        data: &Value,
        container: &str,
    ) -> Result<(), Error>;
}

/// Loads layouts by require path.
#[async_trait]
pub trait LayoutLoader: Send + Sync {
    async fn load(&self, require_path: &str) -> Result<Arc<dyn ContentLayout>, Error>;

    /// Fetch the layout ahead of use without rendering it.
    async fn preload(&self, require_path: &str) -> Result<(), Error> {
        self.load(require_path).await.map(|_| ())
    }
}

struct ResolvedLayout {
    layout_type: LayoutType,
    layout_factory: String,
    require_path: String,
}

impl ContentClient {
    pub async fn get_layout_info(&self, req: &LayoutRequest) -> Result<LayoutInfo, Error> {
        let resolved = self.resolve_layout(req, "getLayoutInfo")?;
        debug!("get_layout_info: require path: {}", resolved.require_path);
        let layout = self.layout_loader()?.load(&resolved.require_path).await?;
        let content_version = match layout.content_version().filter(|v| !v.is_empty()) {
            Some(version) => version,
            None => {
                warn!(
                    "Content Layout \"{}\" does not have a content version specified; assuming {}",
                    req.layout, DEFAULT_LAYOUT_VERSION
                );
                DEFAULT_LAYOUT_VERSION.to_string()
            }
        };
        Ok(LayoutInfo {
            name: req.layout.clone(),
            layout_factory: resolved.layout_factory,
            layout_type: resolved.layout_type,
            require_path: resolved.require_path,
            content_version,
        })
    }

    pub async fn load_content_layout(
        &self,
        req: &LayoutRequest,
    ) -> Result<Arc<dyn ContentLayout>, Error> {
        let resolved = self.resolve_layout(req, "renderLayout")?;
        debug!("load_content_layout: require path: {}", resolved.require_path);
        self.layout_loader()?.load(&resolved.require_path).await
    }

    /// Render an item with a content layout. Only available in the browser runtime.
    pub async fn render_item(&self, req: &RenderItemRequest) -> Result<(), Error> {
        let resolved = self.resolve_layout(&req.layout, "renderLayout")?;
        debug!("render_item: require path: {}", resolved.require_path);
        if self.info.runtime == Runtime::Server {
            return Err(Error::NotSupported("render_item under the server runtime"));
        }
        let loader = self.layout_loader()?;
        if req.preload_layout {
            return loader.preload(&resolved.require_path).await;
        }
        let layout = loader.load(&resolved.require_path).await?;
        layout.render(self, &req.data, &req.container).await
    }

    /// Validate a requested layout type, falling back to the client's content type.
    pub(crate) fn layout_type(&self, requested: Option<&str>) -> LayoutType {
        self.content_type(requested).into()
    }

    fn layout_loader(&self) -> Result<&Arc<dyn LayoutLoader>, Error> {
        self.layouts
            .as_ref()
            .ok_or_else(|| Error::Layout("no layout loader configured".to_string()))
    }

    fn resolve_layout(&self, req: &LayoutRequest, caller: &str) -> Result<ResolvedLayout, Error> {
        if req.layout.is_empty() {
            debug!("{}: missing required parameters", caller);
            return Err(Error::InvalidArgument(format!(
                "missing parameters in call to {}: layout",
                caller
            )));
        }
        let (layout_type, layout_factory) = if SYSTEM_LAYOUTS.contains(&req.layout.as_str()) {
            (LayoutType::System, req.layout.clone())
        } else {
            (
                self.layout_type(req.layout_type.as_deref()),
                format!("{}/assets/render", req.layout),
            )
        };
        let require_path = format!("{}/{}", self.layout_base_path(layout_type), layout_factory);
        Ok(ResolvedLayout {
            layout_type,
            layout_factory,
            require_path,
        })
    }

    /// Directory that serves layouts of the given type, with its cache buster.
    fn layout_base_path(&self, layout_type: LayoutType) -> String {
        let server = &self.info.content_server;
        let cache_buster = self.info.cache_buster.as_ref();
        let segment = |key: Option<&str>| key.map(|k| format!("/{}", k)).unwrap_or_default();
        match layout_type {
            LayoutType::Published => format!(
                "{}/_compdelivery{}",
                server,
                segment(cache_buster.and_then(|cb| cb.layout_key()))
            ),
            LayoutType::Draft | LayoutType::Preview => format!(
                "{}/_themes/_components{}",
                server,
                segment(cache_buster.and_then(|cb| cb.layout_key()))
            ),
            LayoutType::System => format!(
                "{}/_sitescloud{}/sitebuilder/contentlayouts",
                server,
                segment(cache_buster.and_then(|cb| cb.system_key()))
            ),
        }
    }
}
