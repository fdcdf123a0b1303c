//! # Typed Module
//!
//! Lets an endpoint be written as a plain function from a typed request to a
//! typed result, while a generic adapter does the wire work.
//!
//! ## Handler Shapes
//!
//! - **Body-less** ([`OutHandler`]): `Fn(TypedRequest) -> TypedResult<Out, E>`
//! - **Body-bearing** ([`InOutHandler`]): `Fn(TypedRequest<In>) -> TypedResult<Out, E>`,
//!   the body is decoded into `In` before the handler runs
//!
//! Both implement [`Endpoint`], the object-safe trait the router stores.
//!
//! ## Per-Request Sequence
//!
//! 1. decode the body (body-bearing only); on failure the codec writes 400 and we stop
//! 2. invoke the handler
//! 3. encode `value` or `error` with the explicit status, or 200; on failure
//!    the codec writes 500
//!
//! ## Usage
//!
//! ```rust
//! use mplex::codec::Codec;
//! use mplex::server::{RawRequest, RecordedResponse};
//! use mplex::typed::{Endpoint, InOutHandler, TypedRequest, TypedResult};
//! use http::Method;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct Input { name: String }
//!
//! #[derive(Serialize)]
//! struct Greeting { message: String }
//!
//! let codec = Arc::new(Codec::json());
//! let greet = InOutHandler::new(codec, |req: TypedRequest<Input>| {
//!     TypedResult::<_, ()>::ok(Greeting { message: format!("hello {}", req.body.name) })
//! });
//!
//! let mut res = RecordedResponse::new();
//! greet.serve(RawRequest::new(Method::POST, "/").with_body(r#"{"name":"Ryn"}"#), &mut res);
//! assert_eq!(res.body_str(), r#"{"message":"hello Ryn"}"#);
//! ```

mod adapter;
mod core;

pub use adapter::{Endpoint, InOutHandler, OutHandler};
pub use core::{BodyHandler, Handler, Outcome, TypedRequest, TypedResult};
