//! In-memory imitation of the Curated v3 API.
//!
//! Routes live under `/api/v3`. Every request must carry
//! `Authorization: Token token="<key>"`. The store starts with a single
//! publication (`SEEDED_PUBLICATION_ID`) and empty issue, link, subscriber
//! and category collections. Records are arbitrary JSON objects; the server
//! only assigns `id` and merges fields on update.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const SEEDED_PUBLICATION_ID: &str = "42";
pub const DEFAULT_API_KEY: &str = "test-key";

/// Collections nested under a publication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Issues,
    Links,
    Subscribers,
    Categories,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Issues, Kind::Links, Kind::Subscribers, Kind::Categories];

    pub fn segment(self) -> &'static str {
        match self {
            Kind::Issues => "issues",
            Kind::Links => "links",
            Kind::Subscribers => "subscribers",
            Kind::Categories => "categories",
        }
    }
}

#[derive(Debug, Default)]
pub struct Publication {
    pub record: Map<String, Value>,
    pub collections: HashMap<Kind, BTreeMap<u64, Value>>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub publications: BTreeMap<String, Publication>,
    next_id: u64,
}

impl Store {
    pub fn seeded() -> Self {
        let mut store = Store::default();
        let mut record = Map::new();
        record.insert("id".to_string(), json!(42));
        record.insert("name".to_string(), json!("Mock Weekly"));
        record.insert("url".to_string(), json!("https://mock-weekly.curated.co"));
        store
            .publications
            .insert(SEEDED_PUBLICATION_ID.to_string(), Publication { record, ..Default::default() });
        store
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let expected: Arc<str> = Arc::from(format!("Token token=\"{api_key}\"").as_str());

    let mut api = Router::new()
        .route("/publications", get(list_publications))
        .route("/publications/{pid}", get(get_publication))
        .route("/publications/{pid}/issues/{id}/links", get(list_issue_links));
    for kind in Kind::ALL {
        api = collection_routes(api, kind);
    }

    Router::new()
        .nest("/api/v3", api.with_state(db))
        .layer(middleware::from_fn_with_state(expected, require_token))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_key(listener, DEFAULT_API_KEY).await
}

pub async fn run_with_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

fn collection_routes(router: Router<Db>, kind: Kind) -> Router<Db> {
    let segment = kind.segment();
    router
        .route(
            &format!("/publications/{{pid}}/{segment}"),
            get(move |State(db): State<Db>, Path(pid): Path<String>| list_records(db, pid, kind)).post(
                move |State(db): State<Db>, Path(pid): Path<String>, Json(body): Json<Value>| {
                    create_record(db, pid, kind, body)
                },
            ),
        )
        .route(
            &format!("/publications/{{pid}}/{segment}/{{id}}"),
            get(move |State(db): State<Db>, Path((pid, id)): Path<(String, u64)>| get_record(db, pid, id, kind))
                .put(
                    move |State(db): State<Db>,
                          Path((pid, id)): Path<(String, u64)>,
                          Json(body): Json<Value>| update_record(db, pid, id, kind, body),
                )
                .delete(move |State(db): State<Db>, Path((pid, id)): Path<(String, u64)>| {
                    delete_record(db, pid, id, kind)
                }),
        )
}

async fn require_token(State(expected): State<Arc<str>>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == &*expected);
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid token");
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not found")
}

async fn list_publications(State(db): State<Db>) -> Json<Vec<Value>> {
    let store = db.read().await;
    Json(
        store
            .publications
            .values()
            .map(|p| Value::Object(p.record.clone()))
            .collect(),
    )
}

async fn get_publication(State(db): State<Db>, Path(pid): Path<String>) -> Response {
    let store = db.read().await;
    match store.publications.get(&pid) {
        Some(p) => Json(Value::Object(p.record.clone())).into_response(),
        None => not_found(),
    }
}

async fn list_issue_links(State(db): State<Db>, Path((pid, issue_id)): Path<(String, u64)>) -> Response {
    let store = db.read().await;
    let Some(publication) = store.publications.get(&pid) else {
        return not_found();
    };
    let issue_exists = publication
        .collections
        .get(&Kind::Issues)
        .is_some_and(|issues| issues.contains_key(&issue_id));
    if !issue_exists {
        return not_found();
    }
    let links: Vec<Value> = publication
        .collections
        .get(&Kind::Links)
        .map(|links| {
            links
                .values()
                .filter(|link| link.get("issue_id").and_then(Value::as_u64) == Some(issue_id))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(links).into_response()
}

async fn list_records(db: Db, pid: String, kind: Kind) -> Response {
    let store = db.read().await;
    let Some(publication) = store.publications.get(&pid) else {
        return not_found();
    };
    let records: Vec<Value> = publication
        .collections
        .get(&kind)
        .map(|records| records.values().cloned().collect())
        .unwrap_or_default();
    Json(records).into_response()
}

async fn create_record(db: Db, pid: String, kind: Kind, body: Value) -> Response {
    let Value::Object(mut fields) = body else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "body must be a JSON object");
    };
    let mut store = db.write().await;
    if !store.publications.contains_key(&pid) {
        return not_found();
    }
    let id = store.next_id();
    fields.insert("id".to_string(), json!(id));
    let record = Value::Object(fields);
    if let Some(publication) = store.publications.get_mut(&pid) {
        publication
            .collections
            .entry(kind)
            .or_default()
            .insert(id, record.clone());
    }
    tracing::debug!(publication = %pid, kind = kind.segment(), id, "created record");
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_record(db: Db, pid: String, id: u64, kind: Kind) -> Response {
    let store = db.read().await;
    store
        .publications
        .get(&pid)
        .and_then(|p| p.collections.get(&kind))
        .and_then(|records| records.get(&id))
        .map(|record| Json(record.clone()).into_response())
        .unwrap_or_else(not_found)
}

async fn update_record(db: Db, pid: String, id: u64, kind: Kind, body: Value) -> Response {
    let Value::Object(fields) = body else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "body must be a JSON object");
    };
    let mut store = db.write().await;
    let Some(Value::Object(record)) = store
        .publications
        .get_mut(&pid)
        .and_then(|p| p.collections.get_mut(&kind))
        .and_then(|records| records.get_mut(&id))
    else {
        return not_found();
    };
    for (key, value) in fields {
        if key != "id" {
            record.insert(key, value);
        }
    }
    Json(Value::Object(record.clone())).into_response()
}

async fn delete_record(db: Db, pid: String, id: u64, kind: Kind) -> Response {
    let mut store = db.write().await;
    let removed = store
        .publications
        .get_mut(&pid)
        .and_then(|p| p.collections.get_mut(&kind))
        .and_then(|records| records.remove(&id));
    match removed {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}
