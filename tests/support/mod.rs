//! Shared fixtures: an in-memory backend and a gateway served on loopback.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookshelf_kernel::settings::Settings;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// An address nothing listens on.
pub const DEAD_ORIGIN: &str = "http://127.0.0.1:1";

#[derive(Default)]
struct Collection {
    next_id: u64,
    records: BTreeMap<u64, Value>,
}

type Store = Arc<Mutex<HashMap<String, Collection>>>;

fn not_found(collection: &str) -> Response {
    let noun = match collection {
        "books" => "Book",
        "categories" => "Category",
        _ => "Record",
    };
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{noun} not found") })),
    )
        .into_response()
}

async fn list(State(store): State<Store>, Path(collection): Path<String>) -> Response {
    let store = store.lock().unwrap();
    let items: Vec<Value> = store
        .get(&collection)
        .map(|c| c.records.values().cloned().collect())
        .unwrap_or_default();
    // Books come wrapped, categories bare, like the real backend.
    if collection == "books" {
        Json(json!({ "data": items })).into_response()
    } else {
        Json(Value::Array(items)).into_response()
    }
}

async fn create(
    State(store): State<Store>,
    Path(collection): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let entry = store.entry(collection).or_default();
    entry.next_id += 1;
    let id = entry.next_id;
    body["id"] = json!(id);
    entry.records.insert(id, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn fetch(State(store): State<Store>, Path((collection, id)): Path<(String, u64)>) -> Response {
    let store = store.lock().unwrap();
    match store.get(&collection).and_then(|c| c.records.get(&id)) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(&collection),
    }
}

async fn update(
    State(store): State<Store>,
    Path((collection, id)): Path<(String, u64)>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    match store
        .get_mut(&collection)
        .and_then(|c| c.records.get_mut(&id))
    {
        Some(record) => {
            body["id"] = json!(id);
            *record = body.clone();
            Json(body).into_response()
        }
        None => not_found(&collection),
    }
}

async fn remove(State(store): State<Store>, Path((collection, id)): Path<(String, u64)>) -> Response {
    let mut store = store.lock().unwrap();
    match store
        .get_mut(&collection)
        .and_then(|c| c.records.remove(&id))
    {
        Some(_) => Json(json!({ "message": "deleted" })).into_response(),
        None => not_found(&collection),
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

/// Start an in-memory backend and return its origin.
pub async fn spawn_backend() -> String {
    let store: Store = Arc::default();
    let router = Router::new()
        .route("/{collection}", get(list).post(create))
        .route("/{collection}/{id}", get(fetch).put(update).delete(remove))
        .with_state(store);
    serve(router).await
}

pub fn settings_for(origin: &str) -> Settings {
    let mut settings = Settings::default();
    settings.backend.origin = origin.to_string();
    settings
}

/// Start the gateway in front of `origin` and return its root URL.
pub async fn spawn_gateway(origin: &str) -> String {
    let app = bookshelf_app::app(&settings_for(origin)).unwrap();
    serve(app).await
}
