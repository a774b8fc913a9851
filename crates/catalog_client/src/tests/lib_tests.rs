use std::{collections::HashMap, sync::Arc, time::Duration};

use super::*;
use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: Value,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn handle_products(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.queries.lock().await.push(query);
    (state.status, Json(state.body.clone()))
}

async fn spawn_catalog_server(
    status: StatusCode,
    body: Value,
) -> (String, Arc<Mutex<Vec<HashMap<String, String>>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let queries = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        body,
        queries: queries.clone(),
    };
    let app = Router::new()
        .route("/api/v1/products", get(handle_products))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api/v1"), queries)
}

fn record(id: i64, title: &str, price: f64, creation_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "images": [],
        "creationAt": creation_at,
        "updatedAt": creation_at,
        "category": { "id": 1, "name": "Furniture", "image": "https://img.example/f.jpeg" }
    })
}

fn http_service(service_url: &str) -> HttpCatalogService {
    HttpCatalogService::new(service_url, Duration::from_secs(5)).expect("service")
}

struct StaticCatalog {
    records: Vec<Value>,
}

#[async_trait]
impl CatalogService for StaticCatalog {
    async fn fetch_all(&self) -> Result<Vec<Value>, CatalogLoadError> {
        Ok(self.records.clone())
    }
}

struct FailingCatalog;

#[async_trait]
impl CatalogService for FailingCatalog {
    async fn fetch_all(&self) -> Result<Vec<Value>, CatalogLoadError> {
        Err(CatalogLoadError::Status { status: 500 })
    }
}

fn table_and_chair() -> StaticCatalog {
    StaticCatalog {
        records: vec![
            record(1, "Table", 10.0, "2020-01-01"),
            record(2, "Chair", 5.0, "2022-01-01"),
        ],
    }
}

fn view_ids(session: &CatalogSession) -> Vec<i64> {
    session.view().iter().map(|p| p.id.0).collect()
}

#[tokio::test]
async fn load_requests_full_collection() {
    let (service_url, queries) = spawn_catalog_server(
        StatusCode::OK,
        json!([record(1, "Table", 10.0, "2020-01-01")]),
    )
    .await;

    let mut session = CatalogSession::new();
    let status = session.load(&http_service(&service_url)).await.clone();
    assert!(matches!(status, LoadStatus::Loaded(LoadReport { accepted: 1, .. })));

    let queries = queries.lock().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("limit").map(String::as_str), Some("0"));
    assert_eq!(queries[0].get("offset").map(String::as_str), Some("0"));
}

#[tokio::test]
async fn load_skips_bad_records_but_keeps_the_rest() {
    let (service_url, _queries) = spawn_catalog_server(
        StatusCode::OK,
        json!([
            record(1, "Table", 10.0, "2020-01-01"),
            { "id": 2, "title": "Broken" },
            record(3, "Lamp", 7.5, "2023-04-01"),
        ]),
    )
    .await;

    let mut session = CatalogSession::new();
    session.load(&http_service(&service_url)).await;

    assert_eq!(view_ids(&session), vec![1, 3]);
    match session.store().status() {
        LoadStatus::Loaded(report) => {
            assert_eq!(report.accepted, 2);
            assert_eq!(report.skipped.len(), 1);
            assert_eq!(report.skipped[0].index, 1);
            assert_eq!(report.skipped[0].id, Some(2));
        }
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test]
async fn non_success_response_leaves_empty_baseline_and_view() {
    let (service_url, _queries) = spawn_catalog_server(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "boom" }),
    )
    .await;

    let mut session = CatalogSession::new();
    let status = session.load(&http_service(&service_url)).await;
    assert!(status.is_failed());
    assert!(session.store().baseline().is_empty());
    assert!(session.view().is_empty());
}

#[tokio::test]
async fn non_array_body_is_a_load_error() {
    let (service_url, _queries) =
        spawn_catalog_server(StatusCode::OK, json!({ "products": [] })).await;

    let err = http_service(&service_url)
        .fetch_all()
        .await
        .expect_err("must fail");
    assert!(matches!(err, CatalogLoadError::Body(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut session = CatalogSession::new();
    session.load(&http_service(&format!("http://{addr}"))).await;
    assert!(session.store().status().is_failed());
    assert!(session.view().is_empty());
}

#[test]
fn rejects_unparseable_service_url() {
    let err = HttpCatalogService::new("not a url", Duration::from_secs(1))
        .err()
        .expect("must fail");
    assert!(matches!(err, CatalogLoadError::InvalidEndpoint { .. }));
}

#[test]
fn products_endpoint_tolerates_trailing_slash() {
    let endpoint =
        service::products_endpoint("https://api.escuelajs.co/api/v1/").expect("endpoint");
    assert_eq!(
        endpoint.as_str(),
        "https://api.escuelajs.co/api/v1/products"
    );
}

#[tokio::test]
async fn session_view_tracks_each_parameter_change() {
    let mut session = CatalogSession::new();
    session.load(&table_and_chair()).await;
    assert_eq!(view_ids(&session), vec![1, 2]);

    session.set_sort_key(SortKey::PriceAsc);
    assert_eq!(view_ids(&session), vec![2, 1]);

    session.toggle_filter_flag(FilterFlag::New);
    assert_eq!(view_ids(&session), vec![2]);

    session.toggle_filter_flag(FilterFlag::Old);
    assert_eq!(view_ids(&session), vec![2, 1]);

    let view = session.set_search_term("TAB");
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].title, "Table");
}

#[tokio::test]
async fn session_recomputes_from_baseline_not_previous_view() {
    let mut session = CatalogSession::new();
    session.load(&table_and_chair()).await;

    session.toggle_filter_flag(FilterFlag::New);
    assert_eq!(view_ids(&session), vec![2]);

    session.toggle_filter_flag(FilterFlag::New);
    session.toggle_filter_flag(FilterFlag::Old);
    assert_eq!(view_ids(&session), vec![1]);

    session.toggle_filter_flag(FilterFlag::Old);
    assert_eq!(view_ids(&session), vec![1, 2]);
    assert_eq!(session.store().baseline().len(), 2);
}

#[tokio::test]
async fn parameters_set_before_load_apply_once_it_lands() {
    let mut session = CatalogSession::new();
    session.set_sort_key(SortKey::PriceDesc);
    assert!(session.view().is_empty());

    session.load(&table_and_chair()).await;
    assert_eq!(view_ids(&session), vec![1, 2]);
}

#[tokio::test]
async fn failed_reload_empties_the_view() {
    let mut session = CatalogSession::new();
    session.load(&table_and_chair()).await;
    assert_eq!(session.view().len(), 2);

    let status = session.load(&FailingCatalog).await;
    assert!(status.is_failed());
    assert!(session.view().is_empty());
}

#[test]
fn superseded_load_is_discarded() {
    let mut session = CatalogSession::new();
    let stale = session.begin_load();
    let current = session.begin_load();

    let newer = parse_records(vec![record(7, "Sofa", 300.0, "2023-01-01")]);
    assert!(session.finish_load(current, Ok(newer)));

    let older = parse_records(vec![record(8, "Stool", 20.0, "2019-01-01")]);
    assert!(!session.finish_load(stale, Ok(older)));
    assert_eq!(view_ids(&session), vec![7]);
}

#[test]
fn cards_expose_primary_image_or_none() {
    let mut with_image = record(1, "Desk", 120.0, "2022-01-01");
    with_image["images"] = json!(["https://img.example/desk-1.jpeg", "https://img.example/desk-2.jpeg"]);

    let mut session = CatalogSession::new();
    let ticket = session.begin_load();
    session.finish_load(
        ticket,
        Ok(parse_records(vec![with_image, record(2, "Shelf", 60.0, "2022-01-01")])),
    );

    let cards = session.cards();
    assert_eq!(cards.len(), 2);
    assert_eq!(
        cards[0].primary_image.as_deref(),
        Some("https://img.example/desk-1.jpeg")
    );
    assert_eq!(cards[1].primary_image, None);
    assert_eq!(cards[1].price, 60.0);
}

#[test]
fn peeked_ticket_does_not_supersede_in_flight_load() {
    let mut session = CatalogSession::new();
    let in_flight = session.begin_load();
    let peeked = session.next_load_ticket();
    assert_ne!(peeked, in_flight);

    assert!(session.finish_load(
        in_flight,
        Ok(parse_records(vec![record(4, "Bench", 80.0, "2022-01-01")]))
    ));
    assert_eq!(view_ids(&session), vec![4]);
    assert_eq!(session.next_load_ticket(), peeked);
    assert_eq!(session.begin_load(), peeked);
}
