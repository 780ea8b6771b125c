//! Client SDK for a content management REST API.
//!
//! Builds version-specific request URLs for the delivery, preview and
//! management surfaces, issues requests from a server or browser runtime,
//! keeps OAuth bearer tokens fresh and expands asset and page-link macros.

pub mod api;
mod client;
pub mod config;
pub mod errors;
pub mod logger;
pub mod telemetry;
pub mod token;
pub mod transport;

pub use client::{
    BULK_CHUNK_SIZE, CallOptions, ClientInfo, ClientKind, ContentClient, ContentLayout,
    GetItemRequest, GetItemsRequest, GetTypeRequest, GraphqlRequest, LayoutInfo, LayoutLoader,
    LayoutRequest, LayoutType, PageLinkResolver, QueryRequest, RecommendationRequest,
    RenderItemRequest, RenditionRequest, SYSTEM_LAYOUTS, TaxonomyCategoriesRequest,
    create_delivery_client, create_management_client, create_preview_client,
};
pub use config::{CacheBuster, CacheBusterKeys, ClientConfig, ConfigLocation, PreviewClientApi, Runtime};
pub use errors::Error;
pub use token::{OAuthCredentials, TokenManager};
