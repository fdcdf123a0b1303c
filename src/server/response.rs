use http::StatusCode;
use may_minihttp::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Content types the crate ever writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
}

impl ContentType {
    fn header_line(self) -> &'static str {
        match self {
            ContentType::Json => "Content-Type: application/json",
        }
    }
}

/// Outbound response channel.
///
/// Adapters and codecs never return a response to the router; they write it
/// here. Exactly one `write` is expected per request.
pub trait ResponseSink {
    fn write(&mut self, status: StatusCode, content_type: ContentType, body: Vec<u8>);
}

fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("OK")
}

/// In-memory response, used as the buffer between adapters and the socket
/// and as the recorder in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedResponse {
    pub status: StatusCode,
    pub content_type: Option<ContentType>,
    pub body: Vec<u8>,
}

impl RecordedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Deserialize the recorded body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    #[must_use]
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Copy the recorded response onto a `may_minihttp` response
    pub fn flush_into(self, res: &mut Response) {
        res.status_code(self.status.as_u16() as usize, status_reason(self.status));
        if let Some(content_type) = self.content_type {
            res.header(content_type.header_line());
        }
        res.body_vec(self.body);
    }
}

impl Default for RecordedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSink for RecordedResponse {
    fn write(&mut self, status: StatusCode, content_type: ContentType, body: Vec<u8>) {
        self.status = status;
        self.content_type = Some(content_type);
        self.body = body;
    }
}

/// Write a JSON error body that the crate itself authored.
///
/// `Value`'s `Display` cannot fail, so this path never needs its own fallback.
pub fn write_json_error(res: &mut dyn ResponseSink, status: StatusCode, body: Value) {
    res.write(status, ContentType::Json, body.to_string().into_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(StatusCode::OK), "OK");
        assert_eq!(status_reason(StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn test_write_json_error_records_everything() {
        let mut rec = RecordedResponse::new();
        write_json_error(&mut rec, StatusCode::BAD_REQUEST, json!({"error": "nope"}));
        assert_eq!(rec.status, StatusCode::BAD_REQUEST);
        assert_eq!(rec.content_type, Some(ContentType::Json));
        assert_eq!(rec.json::<Value>().unwrap(), json!({"error": "nope"}));
    }
}
