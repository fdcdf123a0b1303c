//! # Router Module
//!
//! Maps a method and a request path onto a registered [`Endpoint`](crate::typed::Endpoint).
//! Only what the typed adapters need: literal segments, `{name}` captures,
//! 404 for unknown paths and 405 for known paths with the wrong method.
//!
//! ```rust,ignore
//! let router = Router::new()
//!     .route(Method::GET, "/{key}", get_value)
//!     .route(Method::PUT, "/{key}", set_value);
//! ```

mod core;


pub use core::{ParamVec, RouteError, RouteMatch, Router, MAX_INLINE_PARAMS};
