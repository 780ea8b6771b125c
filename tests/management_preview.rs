mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use content_delivery_sdk::api::{ContentType, QueryParams};
use content_delivery_sdk::{
    CallOptions, ClientKind, Error, GetTypeRequest, GraphqlRequest, PreviewClientApi,
    QueryRequest, RenditionRequest, TaxonomyCategoriesRequest, create_delivery_client,
    create_management_client, create_preview_client,
};

use common::{config, init_logging};

#[tokio::test]
async fn unavailable_operations_fail_without_network() {
    init_logging();
    let server = MockServer::start().await;
    let cfg = config(&server.uri());

    let delivery = create_delivery_client(&cfg).unwrap();
    assert!(matches!(
        delivery.get_types(&QueryRequest::default()).await,
        Err(Error::NotSupported("get_types"))
    ));
    assert!(matches!(
        delivery.get_type(&GetTypeRequest::new("Blog")).await,
        Err(Error::NotSupported("get_type"))
    ));
    assert!(matches!(
        delivery.query_taxonomies(&QueryRequest::default()).await,
        Err(Error::NotSupported("query_taxonomies"))
    ));

    let management = create_management_client(&cfg).unwrap();
    assert!(matches!(
        management.graphql(&GraphqlRequest::new("{ x }")).await,
        Err(Error::NotSupported("graphql"))
    ));

    let mut preview_cfg = cfg.clone();
    preview_cfg.preview_client_api = PreviewClientApi::PreviewRest;
    let preview = create_preview_client(&preview_cfg).unwrap();
    assert_eq!(preview.kind(), ClientKind::Preview);
    assert!(matches!(
        preview.get_types(&QueryRequest::default()).await,
        Err(Error::Unimplemented("get_types"))
    ));
    assert!(matches!(
        preview.get_taxonomies(&QueryRequest::default()).await,
        Err(Error::Unimplemented("get_taxonomies"))
    ));
    assert!(matches!(
        preview.query_taxonomies(&QueryRequest::default()).await,
        Err(Error::Unimplemented(_))
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn management_lists_types_and_taxonomies_from_draft_state() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/management/api/v1.1/types"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"name": "Blog"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/management/api/v1.1/types/Blog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Blog"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/management/api/v1.1/taxonomies"))
        .and(query_param("q", r#"(status eq "published")"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/published/api/v1.1/taxonomies/TAX1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_management_client(&config(&server.uri())).unwrap();
    assert_eq!(client.get_info().content_type, ContentType::Draft);

    let types = client
        .get_types(&QueryRequest::new(QueryParams::new().limit(5)))
        .await
        .unwrap();
    assert_eq!(types["items"][0]["name"], "Blog");
    client.get_type(&GetTypeRequest::new("Blog")).await.unwrap();
    client
        .query_taxonomies(&QueryRequest::new(
            QueryParams::new().q(r#"(status eq "published")"#),
        ))
        .await
        .unwrap();

    // per-call override to the other state this client accepts
    let mut categories = TaxonomyCategoriesRequest::new("TAX1");
    categories.options = CallOptions::default().content_type("published");
    client.query_taxonomy_categories(&categories).await.unwrap();
}

#[tokio::test]
async fn empty_identifiers_are_rejected() {
    let server = MockServer::start().await;
    let client = create_management_client(&config(&server.uri())).unwrap();
    assert!(matches!(
        client.get_type(&GetTypeRequest::new("")).await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        client
            .query_taxonomy_categories(&TaxonomyCategoriesRequest::new(""))
            .await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn preview_graphql_targets_preview_state() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/content/preview/api/v1.1/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = config(&server.uri());
    cfg.preview_client_api = PreviewClientApi::PreviewRest;
    let client = create_preview_client(&cfg).unwrap();
    client
        .graphql(&GraphqlRequest::new("{ x }").with_variables(json!({"id": 1})))
        .await
        .unwrap();
}

#[test]
fn rendition_urls_follow_client_content_type() {
    let cfg = config("https://cms.example.com");
    let delivery = create_delivery_client(&cfg).unwrap();
    let id = "CONT01234567890123456789012345678901";
    assert_eq!(id.len(), 36);
    assert_eq!(
        delivery.get_rendition_url(&RenditionRequest::by_id(id).rendition("Small")),
        format!(
            "https://cms.example.com/content/published/api/v1.1/assets/{}/Small?channelToken=tok",
            id
        )
    );

    let management = create_management_client(&cfg).unwrap();
    assert_eq!(
        management.get_rendition_url(&RenditionRequest::by_slug("hero.jpg").download(true)),
        "https://cms.example.com/content/management/api/v1.1/assets/.by.slug/hero.jpg/native?download=true"
    );
}
