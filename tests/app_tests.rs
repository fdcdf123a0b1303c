use http::StatusCode;
use mplex::app::{build_router, seeded_store, Record, RecordStore};
use mplex::codec::Codec;
use mplex::server::{AppService, RecordedResponse};
use std::sync::Arc;

mod common;
use common::fixtures::{get, put_json};

fn service(store: Arc<RecordStore>) -> AppService {
    AppService::new(build_router(store, Arc::new(Codec::json())))
}

#[test]
fn test_put_then_get_round_trip() {
    let store = Arc::new(RecordStore::new());
    let service = service(Arc::clone(&store));

    let mut res = RecordedResponse::new();
    service.handle(put_json("/james", r#"{"name":"james","age":0}"#), &mut res);
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body_str(), r#"{"name":"james","age":0}"#);

    let mut res = RecordedResponse::new();
    service.handle(get("/james"), &mut res);
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body_str(), r#"{"name":"james","age":0}"#);

    let mut res = RecordedResponse::new();
    service.handle(get("/unknown"), &mut res);
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body_str(),
        r#"{"message":"key not found in the db: unknown"}"#
    );
}

#[test]
fn test_put_with_missing_field_stores_zero_value() {
    let store = Arc::new(RecordStore::new());
    let service = service(Arc::clone(&store));

    let mut res = RecordedResponse::new();
    service.handle(put_json("/ryn", r#"{"name":"ryn"}"#), &mut res);
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body_str(), r#"{"name":"ryn","age":0}"#);

    let mut res = RecordedResponse::new();
    service.handle(put_json("/empty", "{}"), &mut res);
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(store.get("empty"), Some(Record::default()));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_put_overwrites_existing_record() {
    let store = Arc::new(seeded_store());
    let service = service(Arc::clone(&store));

    let mut res = RecordedResponse::new();
    service.handle(put_json("/james", r#"{"name":"James","age":40}"#), &mut res);
    assert_eq!(res.status, StatusCode::OK);

    assert_eq!(
        store.get("james"),
        Some(Record {
            name: "James".to_string(),
            age: 40
        })
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn test_malformed_put_leaves_store_untouched() {
    let store = Arc::new(seeded_store());
    let service = service(Arc::clone(&store));

    let mut res = RecordedResponse::new();
    service.handle(put_json("/james", r#"{"name":"james","age":"old"}"#), &mut res);
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().unwrap();
    assert_eq!(body["error"], "Invalid request body");

    assert_eq!(store.get("james").map(|r| r.age), Some(0));
}

#[test]
fn test_percent_encoded_keys() {
    let store = Arc::new(RecordStore::new());
    let service = service(Arc::clone(&store));

    let mut res = RecordedResponse::new();
    service.handle(put_json("/jane%20doe", r#"{"name":"jane","age":3}"#), &mut res);
    assert_eq!(res.status, StatusCode::OK);
    assert!(store.contains_key("jane doe"));
}

#[test]
fn test_unsupported_method_is_405() {
    let service = service(Arc::new(seeded_store()));
    let mut res = RecordedResponse::new();
    service.handle(common::fixtures::post_json("/james", "{}"), &mut res);
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}
