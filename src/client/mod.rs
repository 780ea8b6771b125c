use std::sync::Arc;

use crate::api::ContentApi;
use crate::transport::Transport;

mod assets;
mod impls;
mod info;
mod items;
mod kind;
mod layout;
mod requests;

pub use assets::PageLinkResolver;
pub use impls::{create_delivery_client, create_management_client, create_preview_client};
pub use info::ClientInfo;
pub use items::BULK_CHUNK_SIZE;
pub use kind::ClientKind;
pub use layout::{ContentLayout, LayoutInfo, LayoutLoader, LayoutType, SYSTEM_LAYOUTS};
pub use requests::{
    CallOptions, GetItemRequest, GetItemsRequest, GetTypeRequest, GraphqlRequest, LayoutRequest,
    QueryRequest, RecommendationRequest, RenderItemRequest, RenditionRequest,
    TaxonomyCategoriesRequest,
};

/// Client for one content server, fixed to a kind and API version.
#[derive(Clone)]
pub struct ContentClient {
    api: ContentApi,
    info: ClientInfo,
    transport: Arc<dyn Transport>,
    compiler_mode: bool,
    layouts: Option<Arc<dyn LayoutLoader>>,
    page_links: Option<Arc<dyn PageLinkResolver>>,
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field("api", &self.api)
            .field("info", &self.info)
            .field("compiler_mode", &self.compiler_mode)
            .finish_non_exhaustive()
    }
}
