//! # mplex
//!
//! **mplex** lets HTTP endpoints be written as plain typed functions, "given a
//! decoded request body of type `In`, produce an `Out` or an `E`", while a
//! generic adapter does the JSON decoding and encoding around them. Requests
//! are served by `may_minihttp`, one `may` coroutine per request.
//!
//! ## Architecture
//!
//! - **[`typed`]** - request context, result envelope, handler shapes and their adapters
//! - **[`codec`]** - replaceable encode/decode strategy, JSON by default
//! - **[`store`]** - generic concurrent in-memory key/value store
//! - **[`router`]** - method + path-template routing onto typed endpoints
//! - **[`server`]** - raw request model, response sink, `HttpService` and server handle
//! - **[`app`]** - the key/value sample application
//! - **[`logging`]**, **[`runtime_config`]** - ambient plumbing
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Router
//!     participant Adapter as OutHandler / InOutHandler
//!     participant Codec
//!     participant Handler as Typed handler
//!
//!     Client->>Server: PUT /james {"name":"james","age":0}
//!     Server->>Router: match_route(PUT, /james)
//!     Router-->>Server: endpoint + {key: james}
//!     Server->>Adapter: serve(RawRequest, sink)
//!     Adapter->>Codec: decode body into In
//!     alt Malformed body
//!         Codec-->>Client: 400 Bad Request
//!     end
//!     Adapter->>Handler: TypedRequest<In>
//!     Handler-->>Adapter: TypedResult<Out, E>
//!     Adapter->>Codec: encode value or error with status
//!     alt Serialization failure
//!         Codec-->>Client: 500 Internal Server Error
//!     end
//!     Codec-->>Client: 200 {"name":"james","age":0}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mplex::app::{build_router, seeded_store};
//! use mplex::codec::Codec;
//! use mplex::server::AppService;
//! use std::sync::Arc;
//!
//! let router = build_router(Arc::new(seeded_store()), Arc::new(Codec::json()));
//! let handle = AppService::new(router).start("127.0.0.1:4444").unwrap();
//! handle.join().unwrap();
//! ```

pub mod app;
pub mod codec;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;
pub mod typed;

pub use codec::{Codec, CodecError};
pub use server::{AppService, RawRequest, ResponseSink, ServerHandle};
pub use store::Store;
pub use typed::{Endpoint, InOutHandler, OutHandler, TypedRequest, TypedResult};
