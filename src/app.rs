//! # Key/Value Sample Application
//!
//! A store of [`Record`]s keyed by string, exposed over two typed endpoints:
//!
//! | Method | Path     | Shape       | Success                  | Failure                                   |
//! |--------|----------|-------------|--------------------------|-------------------------------------------|
//! | `GET`  | `/{key}` | body-less   | 200, the stored record   | 404 `{"message":"key not found in the db: <key>"}` |
//! | `PUT`  | `/{key}` | body-bearing| 200, the record echoed   | 400 on a malformed body                   |

use crate::codec::Codec;
use crate::router::Router;
use crate::store::Store;
use crate::typed::{BodyHandler, Handler, InOutHandler, OutHandler, TypedRequest, TypedResult};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Stored value. Fields missing from a `PUT` body take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub name: String,
    pub age: i64,
}

/// Error body returned to clients: `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub type RecordStore = Store<Record>;

/// Store pre-populated with the `james` record
#[must_use]
pub fn seeded_store() -> RecordStore {
    [(
        "james",
        Record {
            name: "james".to_string(),
            age: 0,
        },
    )]
    .into_iter()
    .collect()
}

fn missing_key() -> TypedResult<Record, ApiError> {
    TypedResult::err(
        ApiError::new("missing key path parameter"),
        StatusCode::BAD_REQUEST,
    )
}

/// `GET /{key}`
pub struct GetValue {
    store: Arc<RecordStore>,
}

impl GetValue {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl Handler<Record, ApiError> for GetValue {
    fn handle(&self, req: TypedRequest) -> TypedResult<Record, ApiError> {
        let Some(key) = req.path_param("key") else {
            return missing_key();
        };
        match self.store.get(key) {
            Some(record) => TypedResult::ok(record),
            None => {
                debug!(key = %key, "Key not found");
                TypedResult::err(
                    ApiError::new(format!("key not found in the db: {key}")),
                    StatusCode::NOT_FOUND,
                )
            }
        }
    }
}

/// `PUT /{key}`: upsert and echo the stored record
pub struct SetValue {
    store: Arc<RecordStore>,
}

impl SetValue {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

impl BodyHandler<Record, Record, ApiError> for SetValue {
    fn handle(&self, req: TypedRequest<Record>) -> TypedResult<Record, ApiError> {
        let Some(key) = req.path_param("key") else {
            return missing_key();
        };
        let existed = self.store.set(key, req.body.clone());
        debug!(key = %key, existed, "Record stored");
        TypedResult::ok(req.body)
    }
}

/// Wire `GET /{key}` and `PUT /{key}` over `store`
pub fn build_router(store: Arc<RecordStore>, codec: Arc<Codec>) -> Router {
    let get_value: OutHandler<GetValue, Record, ApiError> =
        OutHandler::with_handler(Arc::clone(&codec), GetValue::new(Arc::clone(&store)));
    let set_value: InOutHandler<SetValue, Record, Record, ApiError> =
        InOutHandler::with_handler(codec, SetValue::new(Arc::clone(&store)));

    let router = Router::new()
        .route(Method::GET, "/{key}", get_value)
        .route(Method::PUT, "/{key}", set_value);
    info!(
        routes = router.len(),
        entries = store.len(),
        "Key/value application ready"
    );
    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{RawRequest, RecordedResponse};
    use crate::typed::Endpoint;

    #[test]
    fn test_seeded_store_has_james() {
        let store = seeded_store();
        assert_eq!(
            store.get("james"),
            Some(Record {
                name: "james".to_string(),
                age: 0
            })
        );
    }

    #[test]
    fn test_get_without_key_param_is_400() {
        let codec = Arc::new(Codec::json());
        let endpoint: OutHandler<GetValue, Record, ApiError> =
            OutHandler::with_handler(codec, GetValue::new(Arc::new(Store::new())));
        let mut res = RecordedResponse::new();
        endpoint.serve(RawRequest::new(Method::GET, "/"), &mut res);
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.json::<ApiError>().unwrap(),
            ApiError::new("missing key path parameter")
        );
    }
}
