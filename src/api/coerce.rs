use serde_json::Value;

use super::{ContentApi, ContentVersion, is_truthy};

impl ContentApi {
    /// Reshape a v1.1 response for callers that asked for v1: each item's
    /// `fields` is mirrored into `data` unless `data` is already set.
    ///
    /// A no-op unless v1 was requested.
    pub fn coerce_data(&self, mut response: Value) -> Value {
        if self.requested != Some(ContentVersion::V1) {
            return response;
        }
        if has_fields(&response) {
            mirror_fields(&mut response);
        } else if let Some(items) = response.get_mut("items").and_then(Value::as_array_mut) {
            items.iter_mut().filter(|item| has_fields(item)).for_each(mirror_fields);
        }
        response
    }
}

fn has_fields(value: &Value) -> bool {
    matches!(value.get("fields"), Some(Value::Object(_) | Value::Array(_)))
}

fn mirror_fields(item: &mut Value) {
    let Some(obj) = item.as_object_mut() else {
        return;
    };
    if obj.get("data").is_some_and(is_truthy) {
        return;
    }
    if let Some(fields) = obj.get("fields").cloned() {
        obj.insert("data".to_string(), fields);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_item_gains_data() {
        let api = ContentApi::create(Some("v1"));
        let out = api.coerce_data(json!({"id": "A", "fields": {"title": "t"}}));
        assert_eq!(out["data"], json!({"title": "t"}));
    }

    #[test]
    fn item_list_is_coerced_per_item() {
        let api = ContentApi::create(Some("v1"));
        let out = api.coerce_data(json!({
            "items": [
                {"id": "A", "fields": {"n": 1}},
                {"id": "B", "fields": {"n": 2}, "data": {"kept": true}},
                {"id": "C"}
            ]
        }));
        assert_eq!(out["items"][0]["data"], json!({"n": 1}));
        assert_eq!(out["items"][1]["data"], json!({"kept": true}));
        assert!(out["items"][2].get("data").is_none());
    }

    #[test]
    fn v1_1_clients_pass_responses_through() {
        let api = ContentApi::create(Some("v1.1"));
        let body = json!({"fields": {"n": 1}});
        assert_eq!(api.coerce_data(body.clone()), body);
    }
}
