use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_key, SEEDED_PUBLICATION_ID};
use serde_json::{json, Value};
use tower::ServiceExt;

const AUTH: &str = "Token token=\"test-key\"";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn send(app: &Router, req: Request<String>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v3/publications")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let resp = app_with_key("other-key")
        .oneshot(request("GET", "/api/v3/publications"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- publications ---

#[tokio::test]
async fn list_publications_returns_seed() {
    let resp = app().oneshot(request("GET", "/api/v3/publications")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let publications = body_json(resp).await;
    assert_eq!(publications.as_array().unwrap().len(), 1);
    assert_eq!(publications[0]["id"], 42);
}

#[tokio::test]
async fn unknown_publication_returns_404() {
    let app = app();
    let resp = send(&app, request("GET", "/api/v3/publications/999")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, request("GET", "/api/v3/publications/999/issues")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, json_request("POST", "/api/v3/publications/999/links", "{}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- records ---

#[tokio::test]
async fn create_rejects_non_object_body() {
    let uri = format!("/api/v3/publications/{SEEDED_PUBLICATION_ID}/subscribers");
    let resp = app().oneshot(json_request("POST", &uri, "[1,2]")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_numeric_record_id_returns_400() {
    let uri = format!("/api/v3/publications/{SEEDED_PUBLICATION_ID}/categories/abc");
    let resp = app().oneshot(request("GET", &uri)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_missing_record_return_404() {
    let app = app();
    let uri = format!("/api/v3/publications/{SEEDED_PUBLICATION_ID}/issues/77");

    let resp = send(&app, json_request("PUT", &uri, r#"{"title":"Nope"}"#)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn issue_links_filter_by_issue_id() {
    let app = app();
    let base = format!("/api/v3/publications/{SEEDED_PUBLICATION_ID}");

    let resp = send(&app, json_request("POST", &format!("{base}/issues"), r#"{"title":"Issue"}"#)).await;
    let issue_id = body_json(resp).await["id"].as_u64().unwrap();

    let attached = format!(r#"{{"url":"https://a.example","issue_id":{issue_id}}}"#);
    send(&app, json_request("POST", &format!("{base}/links"), &attached)).await;
    send(&app, json_request("POST", &format!("{base}/links"), r#"{"url":"https://b.example"}"#)).await;

    let resp = send(&app, request("GET", &format!("{base}/issues/{issue_id}/links"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let links = body_json(resp).await;
    assert_eq!(links.as_array().unwrap().len(), 1);
    assert_eq!(links[0]["url"], "https://a.example");

    let resp = send(&app, request("GET", &format!("{base}/issues/999/links"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle_for_every_collection() {
    let app = app();
    for segment in ["issues", "links", "subscribers", "categories"] {
        let collection = format!("/api/v3/publications/{SEEDED_PUBLICATION_ID}/{segment}");

        // create keeps unknown fields
        let resp = send(
            &app,
            json_request("POST", &collection, r#"{"title":"First","custom":{"flag":true}}"#),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED, "{segment}");
        let created = body_json(resp).await;
        assert_eq!(created["title"], "First");
        assert_eq!(created["custom"], json!({"flag": true}));
        let id = created["id"].as_u64().unwrap();
        let record = format!("{collection}/{id}");

        // list
        let resp = send(&app, request("GET", &collection)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let records = body_json(resp).await;
        assert_eq!(records.as_array().unwrap().len(), 1, "{segment}");

        // get
        let resp = send(&app, request("GET", &record)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, created);

        // update merges and never changes the id
        let resp = send(&app, json_request("PUT", &record, r#"{"title":"Second","id":999}"#)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = body_json(resp).await;
        assert_eq!(updated["title"], "Second");
        assert_eq!(updated["custom"], json!({"flag": true}));
        assert_eq!(updated["id"], id);

        // delete
        let resp = send(&app, request("DELETE", &record)).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(resp).await.is_empty());

        // get after delete
        let resp = send(&app, request("GET", &record)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // list after delete
        let resp = send(&app, request("GET", &collection)).await;
        assert!(body_json(resp).await.as_array().unwrap().is_empty());
    }
}
