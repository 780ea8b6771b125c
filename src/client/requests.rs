//! Per-operation arguments.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::api::QueryParams;
use crate::transport::BeforeSend;

/// Per-call overrides shared by every operation.
#[derive(Clone, Default)]
pub struct CallOptions {
    /// Requested content type; checked against the client's accepted types.
    pub content_type: Option<String>,
    pub language: Option<String>,
    pub timeout: Option<Duration>,
    pub before_send: Option<Arc<dyn BeforeSend>>,
    /// Raw query fragment appended after the generated parameters.
    pub search: Option<String>,
}

impl CallOptions {
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn before_send(mut self, hook: Arc<dyn BeforeSend>) -> Self {
        self.before_send = Some(hook);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("content_type", &self.content_type)
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("before_send", &self.before_send.is_some())
            .field("search", &self.search)
            .finish()
    }
}

/// A single item, by id or by slug.
#[derive(Clone, Debug, Default)]
pub struct GetItemRequest {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub params: QueryParams,
    pub options: CallOptions,
}

impl GetItemRequest {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

/// Several items by id, or every item of the given types when `ids` is empty.
#[derive(Clone, Debug, Default)]
pub struct GetItemsRequest {
    pub ids: Vec<String>,
    pub types: Option<String>,
    pub params: QueryParams,
    pub options: CallOptions,
}

impl GetItemsRequest {
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

/// Free-form query used by search, taxonomy and type listings.
#[derive(Clone, Debug, Default)]
pub struct QueryRequest {
    pub params: QueryParams,
    pub options: CallOptions,
}

impl QueryRequest {
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            options: CallOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Option<Value>,
    pub options: CallOptions,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct TaxonomyCategoriesRequest {
    pub id: String,
    pub params: QueryParams,
    pub options: CallOptions,
}

impl TaxonomyCategoriesRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetTypeRequest {
    pub type_name: String,
    pub options: CallOptions,
}

impl GetTypeRequest {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            options: CallOptions::default(),
        }
    }
}

/// A rendition of a digital asset. `rendition` defaults to the API's native name.
#[derive(Clone, Debug, Default)]
pub struct RenditionRequest {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub rendition: Option<String>,
    pub format: Option<String>,
    pub download: Option<bool>,
    pub options: CallOptions,
}

impl RenditionRequest {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    pub fn rendition(mut self, name: impl Into<String>) -> Self {
        self.rendition = Some(name.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = Some(download);
        self
    }
}

/// Recommendation results, by recommendation id or API name.
#[derive(Clone, Debug, Default)]
pub struct RecommendationRequest {
    pub id: Option<String>,
    pub api_name: Option<String>,
    /// Attribute name to a value or an array of values.
    pub audience_attributes: Option<Map<String, Value>>,
    pub params: QueryParams,
    pub options: CallOptions,
}

impl RecommendationRequest {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_api_name(api_name: impl Into<String>) -> Self {
        Self {
            api_name: Some(api_name.into()),
            ..Self::default()
        }
    }

    pub fn with_audience_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.audience_attributes = Some(attributes);
        self
    }
}

/// Names a content layout in the component catalog.
#[derive(Clone, Debug, Default)]
pub struct LayoutRequest {
    pub layout: String,
    pub layout_type: Option<String>,
}

impl LayoutRequest {
    pub fn new(layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            layout_type: None,
        }
    }

    pub fn layout_type(mut self, layout_type: impl Into<String>) -> Self {
        self.layout_type = Some(layout_type.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderItemRequest {
    pub layout: LayoutRequest,
    pub data: Value,
    /// Identifier of the element the layout renders into.
    pub container: String,
    /// Load the layout without rendering it.
    pub preload_layout: bool,
}
