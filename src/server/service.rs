use super::request::RawRequest;
use super::response::{write_json_error, ContentType, RecordedResponse, ResponseSink};
use crate::router::{RouteError, Router};
use http::{Method, StatusCode};
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// `may_minihttp` service that routes each request to a typed endpoint.
///
/// Cloned once per connection by the server; the router is shared.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    health_endpoint: bool,
}

impl AppService {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
            health_endpoint: false,
        }
    }

    /// Answer `GET /health` before routing.
    ///
    /// This shadows any route that would otherwise match `/health`.
    #[must_use]
    pub fn with_health_endpoint(mut self, enabled: bool) -> Self {
        self.health_endpoint = enabled;
        self
    }

    #[must_use]
    pub fn health_endpoint_enabled(&self) -> bool {
        self.health_endpoint
    }

    /// Route `req` and write exactly one response to `res`
    pub fn handle(&self, mut req: RawRequest, res: &mut dyn ResponseSink) {
        if self.health_endpoint && req.method == Method::GET && req.path == "/health" {
            health_endpoint(res);
            return;
        }

        match self.router.match_route(&req.method, &req.path) {
            Ok(route_match) => {
                req.path_params = route_match.path_params;
                route_match.endpoint.serve(req, res);
            }
            Err(err) => {
                warn!(
                    request_id = %req.request_id,
                    method = %req.method,
                    path = %req.path,
                    error = %err,
                    "Request not routed"
                );
                let error = match &err {
                    RouteError::NotFound => "Not Found",
                    RouteError::MethodNotAllowed { .. } => "Method Not Allowed",
                };
                write_json_error(
                    res,
                    err.status(),
                    json!({
                        "error": error,
                        "method": req.method.as_str(),
                        "path": req.path
                    }),
                );
            }
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let started = Instant::now();
        let mut recorded = RecordedResponse::new();

        match RawRequest::from_minihttp(req) {
            Ok(raw) => {
                let request_id = raw.request_id;
                let method = raw.method.clone();
                let path = raw.path.clone();
                self.handle(raw, &mut recorded);
                info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = recorded.status.as_u16(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    "Request completed"
                );
            }
            Err(err) => {
                warn!(error = %err, "Rejected request with invalid method");
                write_json_error(
                    &mut recorded,
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid HTTP method" }),
                );
            }
        }

        recorded.flush_into(res);
        Ok(())
    }
}

/// Basic health check returning `{ "status": "ok" }`
pub fn health_endpoint(res: &mut dyn ResponseSink) {
    res.write(
        StatusCode::OK,
        ContentType::Json,
        json!({ "status": "ok" }).to_string().into_bytes(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::typed::{OutHandler, TypedRequest, TypedResult};
    use serde_json::Value;

    fn service() -> AppService {
        let echo_key = OutHandler::new(Arc::new(Codec::json()), |req: TypedRequest| {
            TypedResult::<String, ()>::ok(req.path_param("key").unwrap_or_default().to_string())
        });
        AppService::new(Router::new().route(Method::GET, "/{key}", echo_key))
    }

    #[test]
    fn test_path_params_reach_endpoint() {
        let mut rec = RecordedResponse::new();
        service().handle(RawRequest::new(Method::GET, "/abc"), &mut rec);
        assert_eq!(rec.status, StatusCode::OK);
        assert_eq!(rec.json::<String>().unwrap(), "abc");
    }

    #[test]
    fn test_unrouted_path_is_404() {
        let mut rec = RecordedResponse::new();
        service().handle(RawRequest::new(Method::GET, "/a/b"), &mut rec);
        assert_eq!(rec.status, StatusCode::NOT_FOUND);
        let body: Value = rec.json().unwrap();
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], "/a/b");
    }

    #[test]
    fn test_wrong_method_is_405() {
        let mut rec = RecordedResponse::new();
        service().handle(RawRequest::new(Method::POST, "/abc"), &mut rec);
        assert_eq!(rec.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_health_endpoint_only_when_enabled() {
        let mut rec = RecordedResponse::new();
        service()
            .with_health_endpoint(true)
            .handle(RawRequest::new(Method::GET, "/health"), &mut rec);
        assert_eq!(rec.json::<Value>().unwrap(), json!({ "status": "ok" }));

        let mut rec = RecordedResponse::new();
        service().handle(RawRequest::new(Method::GET, "/health"), &mut rec);
        assert_eq!(rec.json::<String>().unwrap(), "health");
    }
}
