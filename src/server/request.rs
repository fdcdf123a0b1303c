use crate::router::ParamVec;
use http::Method;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};
use ulid::Ulid;

/// Raw inbound request as handed to a typed handler adapter.
///
/// Holds everything a handler may want besides its decoded body: method,
/// path, query and path parameters, headers and the undecoded body bytes.
#[derive(Debug, Clone)]
pub struct RawRequest {
    /// Correlation id: the inbound `x-request-id` when it is a ULID, otherwise fresh
    pub request_id: Ulid,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Parameters captured by the router from the path template
    pub path_params: ParamVec,
    /// Parsed query string parameters
    pub query_params: HashMap<String, String>,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Request body exactly as received
    pub body: Vec<u8>,
}

impl RawRequest {
    /// Build a request from a method and a path that may carry a query string.
    ///
    /// Mostly useful for driving adapters without a socket:
    ///
    /// ```rust
    /// use mplex::server::RawRequest;
    /// use http::Method;
    ///
    /// let req = RawRequest::new(Method::PUT, "/james?dry_run=true")
    ///     .with_body(r#"{"name":"james","age":0}"#);
    /// assert_eq!(req.path, "/james");
    /// assert_eq!(req.get_query_param("dry_run"), Some("true"));
    /// ```
    pub fn new(method: Method, path: &str) -> Self {
        let (path_only, query_params) = split_path(path);
        Self {
            request_id: Ulid::new(),
            method,
            path: path_only,
            path_params: ParamVec::new(),
            query_params,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn with_path_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.path_params.push((Arc::from(name), value.into()));
        self
    }

    /// Get a path parameter by name (last occurrence wins)
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Extract a [`RawRequest`] from a `may_minihttp::Request`.
    ///
    /// A body that cannot be read completely is kept as far as it was read;
    /// the decoder then fails on it and answers 400.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the request line carries an invalid method.
    pub fn from_minihttp(req: Request) -> Result<Self, http::method::InvalidMethod> {
        let method: Method = req.method().parse()?;
        let (path, query_params) = split_path(req.path());

        let headers: HashMap<String, String> = req
            .headers()
            .iter()
            .map(|h| {
                (
                    h.name.to_ascii_lowercase(),
                    String::from_utf8_lossy(h.value).to_string(),
                )
            })
            .collect();
        let request_id = request_id_from(headers.get("x-request-id").map(String::as_str));

        let mut body = Vec::new();
        if let Err(err) = req.body().read_to_end(&mut body) {
            warn!(
                request_id = %request_id,
                error = %err,
                bytes_read = body.len(),
                "Request body read failed"
            );
        }

        debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            header_count = headers.len(),
            body_size_bytes = body.len(),
            "HTTP request parsed"
        );

        Ok(Self {
            request_id,
            method,
            path,
            path_params: ParamVec::new(),
            query_params,
            headers,
            body,
        })
    }
}

/// Reuse a caller-supplied ULID so logs correlate across hops
fn request_id_from(header: Option<&str>) -> Ulid {
    header
        .and_then(|value| Ulid::from_string(value.trim()).ok())
        .unwrap_or_else(Ulid::new)
}

/// Split `/a/b?x=1` into the bare path and its URL-decoded query parameters
fn split_path(raw: &str) -> (String, HashMap<String, String>) {
    match raw.split_once('?') {
        Some((path, query)) => (
            path.to_string(),
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        None => (raw.to_string(), HashMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        let (path, q) = split_path("/p?x=1&y=two%20words");
        assert_eq!(path, "/p");
        assert_eq!(q.get("x"), Some(&"1".to_string()));
        assert_eq!(q.get("y"), Some(&"two words".to_string()));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = RawRequest::new(Method::GET, "/").with_header("X-Token", "abc");
        assert_eq!(req.get_header("x-token"), Some("abc"));
        assert_eq!(req.get_header("X-TOKEN"), Some("abc"));
    }

    #[test]
    fn test_request_id_header_is_reused_when_valid() {
        let upstream = Ulid::new();
        let text = format!(" {upstream} ");
        assert_eq!(request_id_from(Some(&text)), upstream);
        assert_ne!(request_id_from(Some("not-a-ulid")), request_id_from(None));
    }

    #[test]
    fn test_last_path_param_wins() {
        let req = RawRequest::new(Method::GET, "/")
            .with_path_param("id", "1")
            .with_path_param("id", "2");
        assert_eq!(req.get_path_param("id"), Some("2"));
        assert_eq!(req.get_path_param("missing"), None);
    }
}
