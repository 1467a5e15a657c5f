//! Verify build/parse methods against JSON test vectors in `test-vectors/`.
//!
//! Each case names an operation, its inputs, the request it must produce, a
//! simulated response, and either the expected decoded result or the
//! expected error kind. Bodies are compared as parsed JSON so field order in
//! the serialized string does not matter.

use curated_core::{ApiError, ClientConfig, CuratedClient, HttpMethod, HttpRequest, HttpResponse, Payload};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn build(client: &CuratedClient, case: &Value) -> HttpRequest {
    let id = case["id"].as_str().unwrap_or_default();
    let payload: Payload = case
        .get("payload")
        .map(|p| serde_json::from_value(p.clone()).unwrap())
        .unwrap_or_default();
    let result = match case["operation"].as_str().unwrap() {
        "list_publications" => Ok(client.build_list_publications()),
        "get_publication" => client.build_get_publication(),
        "list_issues" => client.build_list_issues(),
        "get_issue" => client.build_get_issue(id),
        "create_issue" => client.build_create_issue(&payload),
        "update_issue" => client.build_update_issue(id, &payload),
        "delete_issue" => client.build_delete_issue(id),
        "list_links" => client.build_list_links(),
        "list_issue_links" => client.build_list_issue_links(id),
        "get_link" => client.build_get_link(id),
        "create_link" => client.build_create_link(&payload),
        "update_link" => client.build_update_link(id, &payload),
        "delete_link" => client.build_delete_link(id),
        "list_subscribers" => client.build_list_subscribers(),
        "get_subscriber" => client.build_get_subscriber(id),
        "create_subscriber" => client.build_create_subscriber(&payload),
        "update_subscriber" => client.build_update_subscriber(id, &payload),
        "delete_subscriber" => client.build_delete_subscriber(id),
        "list_categories" => client.build_list_categories(),
        "get_category" => client.build_get_category(id),
        "create_category" => client.build_create_category(&payload),
        "update_category" => client.build_update_category(id, &payload),
        "delete_category" => client.build_delete_category(id),
        other => panic!("unknown operation: {other}"),
    };
    result.unwrap()
}

/// Deletes carry no body; everything else decodes JSON.
fn parse(client: &CuratedClient, operation: &str, response: HttpResponse) -> Result<Value, ApiError> {
    if operation.starts_with("delete_") {
        client.parse_empty(response).map(|()| Value::Null)
    } else {
        client.parse_json(response)
    }
}

fn assert_error_kind(name: &str, err: &ApiError, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "http" => {
            let status = expected["status"].as_u64().unwrap() as u16;
            assert_eq!(err.status(), Some(status), "{name}: status");
        }
        "deserialization" => assert!(matches!(err, ApiError::Deserialization(_)), "{name}: {err}"),
        other => panic!("{name}: unknown error kind {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let base_url = vectors["base_url"].as_str().unwrap();
    let api_key = vectors["api_key"].as_str().unwrap();
    let config = ClientConfig::new(api_key).with_base_url(base_url);
    let client = CuratedClient::new(&config).with_publication_id(vectors["publication_id"].as_str().unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&client, case);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("Authorization"), Some("Token token=\"k1\""), "{name}: auth");
        match expected_req.get("body") {
            Some(expected_body) => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: body should be None"),
        }

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = parse(&client, operation, response);
        match case.get("expected_error") {
            Some(expected) => assert_error_kind(name, &result.unwrap_err(), expected),
            None => assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result"),
        }
    }
}
