use content_delivery_sdk::api::QueryParams;
use content_delivery_sdk::{
    ClientConfig, ConfigLocation, GetItemsRequest, QueryRequest, create_delivery_client,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the demo
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // CONTENT_SERVER and CHANNEL_TOKEN must be set
    let cfg = ClientConfig::load(ConfigLocation::Env).await?;
    let client = create_delivery_client(&cfg)?;

    let blogs = client
        .query_items(&QueryRequest::new(
            QueryParams::new().q(r#"(type eq "Blog")"#).limit(5),
        ))
        .await?;
    println!("{}", serde_json::to_string_pretty(&blogs)?);

    let ids: Vec<String> = blogs["items"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item["id"].as_str().map(str::to_owned))
        .collect();
    if !ids.is_empty() {
        let items = client
            .get_items(&GetItemsRequest::ids(ids).with_params(QueryParams::new().fields("ALL")))
            .await?;
        println!("{}", client.expand_macros_value(items));
    }
    Ok(())
}
