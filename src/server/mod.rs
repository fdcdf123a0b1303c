pub mod listener;
pub mod request;
pub mod response;
pub mod service;

pub use listener::ServerHandle;
pub use request::RawRequest;
pub use response::{write_json_error, ContentType, RecordedResponse, ResponseSink};
pub use service::{health_endpoint, AppService};
