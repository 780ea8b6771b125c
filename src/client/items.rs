use futures::future::try_join_all;
use reqwest::Method;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::api::{
    BulkItemsPath, ContentType, ItemListPath, ItemPath, QueryParams, RecommendationPath, value_text,
};
use crate::errors::Error;

use super::kind::Operation;
use super::{
    ContentClient, GetItemRequest, GetItemsRequest, GetTypeRequest, GraphqlRequest, QueryRequest,
    RecommendationRequest, TaxonomyCategoriesRequest,
};

/// Ids per bulk request.
pub const BULK_CHUNK_SIZE: usize = 10;

impl ContentClient {
    pub async fn get_item(&self, req: &GetItemRequest) -> Result<Value, Error> {
        let id = req.id.as_deref().filter(|id| !id.is_empty());
        let slug = req.slug.as_deref().filter(|slug| !slug.is_empty());
        if id.is_none() && slug.is_none() {
            return Err(Error::InvalidArgument(
                "get_item requires an id or a slug".to_string(),
            ));
        }

        let args = self.resolve_rest_args(Method::GET, &req.params, &req.options);
        let path = self.api.resolve_get_item_path(&ItemPath {
            id,
            slug,
            language: args.language.as_deref(),
            asset_version: args.asset_version.as_deref(),
            use_aggregate: args.use_aggregate.as_deref(),
        });
        let url = self.api.format_url(&path, &args);
        self.call(&url, &args).await
    }

    /// Fetch items by id in concurrent chunks of [`BULK_CHUNK_SIZE`], or list
    /// items by type when no ids are given.
    ///
    /// All chunks must succeed; the first failure fails the whole call.
    pub async fn get_items(&self, req: &GetItemsRequest) -> Result<Value, Error> {
        let args = self.resolve_rest_args(Method::GET, &req.params, &req.options);

        if req.ids.is_empty() {
            let path = self.api.resolve_get_item_list_path(&ItemListPath {
                types: req.types.as_deref(),
                use_aggregate: args.use_aggregate.as_deref(),
            });
            let url = self.api.format_url(&path, &args);
            return self.call(&url, &args).await;
        }

        let args = &args;
        let chunks = req.ids.chunks(BULK_CHUNK_SIZE).map(|ids| {
            let path = self.api.resolve_get_bulk_item_list_path(&BulkItemsPath {
                ids,
                use_aggregate: args.use_aggregate.as_deref(),
                language: args.language.as_deref(),
            });
            let url = self.api.format_url(&path, args);
            async move { self.call(&url, args).await }
        });
        debug!(
            ids = req.ids.len(),
            chunks = req.ids.len().div_ceil(BULK_CHUNK_SIZE),
            "bulk item fetch"
        );
        let results = try_join_all(chunks).await?;
        Ok(merge_bulk_results(results))
    }

    /// Search items with a free-form query.
    pub async fn query_items(&self, req: &QueryRequest) -> Result<Value, Error> {
        let mut args = self.resolve_rest_args(Method::GET, &req.params, &req.options);
        args.no_csrf_token = true;
        let url = self.api.format_url(&self.api.resolve_search_path(), &args);
        self.call(&url, &args).await
    }

    pub async fn search_items(&self, req: &QueryRequest) -> Result<Value, Error> {
        self.query_items(req).await
    }

    pub async fn graphql(&self, req: &GraphqlRequest) -> Result<Value, Error> {
        self.info.client_type.ensure(Operation::Graphql)?;
        let mut args = self.resolve_rest_args(Method::POST, &QueryParams::new(), &req.options);
        args.post_data = Some(json!({
            "query": req.query,
            "variables": req.variables,
        }));
        args.no_csrf_token = true;
        let url = self.api.format_graphql_url(&args);
        self.call(&url, &args).await
    }

    pub async fn get_taxonomies(&self, req: &QueryRequest) -> Result<Value, Error> {
        self.info.client_type.ensure(Operation::GetTaxonomies)?;
        let args = self.resolve_rest_args(Method::GET, &req.params, &req.options);
        let url = self
            .api
            .format_url(&self.api.resolve_get_taxonomies_path(), &args);
        self.call(&url, &args).await
    }

    pub async fn query_taxonomies(&self, req: &QueryRequest) -> Result<Value, Error> {
        self.info.client_type.ensure(Operation::QueryTaxonomies)?;
        self.get_taxonomies(req).await
    }

    pub async fn query_taxonomy_categories(
        &self,
        req: &TaxonomyCategoriesRequest,
    ) -> Result<Value, Error> {
        if req.id.is_empty() {
            return Err(Error::InvalidArgument(
                "query_taxonomy_categories requires a taxonomy id".to_string(),
            ));
        }
        let args = self.resolve_rest_args(Method::GET, &req.params, &req.options);
        let path = self.api.resolve_query_taxonomy_categories_path(&req.id);
        let url = self.api.format_url(&path, &args);
        self.call(&url, &args).await
    }

    pub async fn get_types(&self, req: &QueryRequest) -> Result<Value, Error> {
        self.info.client_type.ensure(Operation::GetTypes)?;
        let args = self.resolve_rest_args(Method::GET, &req.params, &req.options);
        let url = self.api.format_url(&self.api.resolve_get_types_path(), &args);
        self.call(&url, &args).await
    }

    pub async fn get_type(&self, req: &GetTypeRequest) -> Result<Value, Error> {
        self.info.client_type.ensure(Operation::GetType)?;
        if req.type_name.is_empty() {
            return Err(Error::InvalidArgument(
                "get_type requires a type name".to_string(),
            ));
        }
        let args = self.resolve_rest_args(Method::GET, &QueryParams::new(), &req.options);
        let url = self
            .api
            .format_url(&self.api.resolve_get_type_path(&req.type_name), &args);
        self.call(&url, &args).await
    }

    /// Published content is queried with GET and `attribute.{name}` pairs;
    /// other content types POST the audience attributes.
    pub async fn get_recommendation_results(
        &self,
        req: &RecommendationRequest,
    ) -> Result<Value, Error> {
        let content_type = self.content_type(req.options.content_type.as_deref());
        let args = if content_type == ContentType::Published {
            let mut args = self.resolve_rest_args(Method::GET, &req.params, &req.options);
            if let Some(attributes) = req.audience_attributes.as_ref() {
                for pairs in attributes.iter().map(|(name, values)| attribute_pairs(name, values)) {
                    if pairs.is_empty() {
                        continue;
                    }
                    if args.search.is_empty() {
                        args.search = pairs;
                    } else {
                        args.search = format!("{}&{}", args.search, pairs);
                    }
                }
            }
            args
        } else {
            let mut args = self.resolve_rest_args(Method::POST, &req.params, &req.options);
            args.no_csrf_token = true;
            let asset_state = match self.info.content_type {
                ContentType::Published => "PUBLISHED",
                _ => "ALL",
            };
            if let Some(attributes) = req.audience_attributes.as_ref() {
                args.post_data = Some(json!({
                    "audienceAttributes": attributes,
                    "assetState": asset_state,
                }));
            }
            args
        };

        let path = self.api.resolve_get_recommendation_path(&RecommendationPath {
            id: req.id.as_deref(),
            api_name: req.api_name.as_deref(),
        });
        let url = self.api.format_url(&path, &args);
        self.call(&url, &args).await
    }
}

/// `attribute.{name}={value}` for each value, component-encoded.
fn attribute_pairs(name: &str, values: &Value) -> String {
    let key = urlencoding::encode(&format!("attribute.{}", name)).into_owned();
    let values = match values {
        Value::Array(values) => values.iter().collect::<Vec<_>>(),
        single => vec![single],
    };
    values
        .into_iter()
        .map(|value| format!("{}={}", key, urlencoding::encode(&value_text(value))))
        .collect::<Vec<_>>()
        .join("&")
}

/// Arrays of items are concatenated in chunk order; keyed items are merged.
fn merge_bulk_results(results: Vec<Value>) -> Value {
    let mut listed = Vec::new();
    let mut keyed: Option<Map<String, Value>> = None;
    for result in results {
        let Value::Object(mut body) = result else {
            continue;
        };
        match body.remove("items") {
            Some(Value::Array(items)) => listed.extend(items),
            Some(Value::Object(items)) => keyed.get_or_insert_with(Map::new).extend(items),
            _ => {}
        }
    }
    match keyed {
        Some(items) if listed.is_empty() => json!({ "items": items }),
        _ => json!({ "items": listed }),
    }
}
