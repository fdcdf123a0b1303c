use crate::server::RawRequest;
use http::{Method, StatusCode};
use ulid::Ulid;

/// Request context handed to a typed handler.
///
/// Body-less handlers receive `TypedRequest<()>`; body-bearing handlers get
/// the already decoded input as `body`. Built fresh for every call and
/// consumed by the handler.
#[derive(Debug, Clone)]
pub struct TypedRequest<In = ()> {
    /// The inbound request, for path/query/header access
    pub raw: RawRequest,
    /// Decoded request body
    pub body: In,
}

impl<In> TypedRequest<In> {
    pub fn new(raw: RawRequest, body: In) -> Self {
        Self { raw, body }
    }

    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.raw.get_path_param(name)
    }

    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.raw.get_query_param(name)
    }

    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.get_header(name)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.raw.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.raw.path
    }

    #[must_use]
    pub fn request_id(&self) -> Ulid {
        self.raw.request_id
    }
}

/// What a handler produced: its output or its domain error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Value(T),
    Error(E),
}

/// Typed envelope returned by every handler.
///
/// Exactly one of value or error is carried. `status` of `None` means "use
/// the default", which is 200 for either variant; handlers signalling a
/// domain error normally pass an explicit status through [`TypedResult::err`].
///
/// ```rust
/// use mplex::typed::TypedResult;
/// use http::StatusCode;
///
/// let found: TypedResult<u32, String> = TypedResult::ok(7);
/// assert_eq!(found.status_code(), StatusCode::OK);
///
/// let missing: TypedResult<u32, String> = TypedResult::err("gone".into(), StatusCode::NOT_FOUND);
/// assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedResult<T, E> {
    pub outcome: Outcome<T, E>,
    pub status: Option<StatusCode>,
}

impl<T, E> TypedResult<T, E> {
    /// Success with the default status
    pub fn ok(value: T) -> Self {
        Self {
            outcome: Outcome::Value(value),
            status: None,
        }
    }

    pub fn ok_with_status(value: T, status: StatusCode) -> Self {
        Self {
            outcome: Outcome::Value(value),
            status: Some(status),
        }
    }

    pub fn err(error: E, status: StatusCode) -> Self {
        Self {
            outcome: Outcome::Error(error),
            status: Some(status),
        }
    }

    /// Override the status of an existing result
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Status the adapter will write
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Value(_))
    }
}

/// `Ok`/`Err` map onto value/error with the default status.
impl<T, E> From<Result<T, E>> for TypedResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        let outcome = match result {
            Ok(value) => Outcome::Value(value),
            Err(error) => Outcome::Error(error),
        };
        Self {
            outcome,
            status: None,
        }
    }
}

/// Business logic of a body-less endpoint.
///
/// Implemented for every matching closure; implement it on a named type when
/// the handler carries state such as a store handle.
pub trait Handler<Out, E>: Send + Sync + 'static {
    fn handle(&self, req: TypedRequest) -> TypedResult<Out, E>;
}

impl<Out, E, F> Handler<Out, E> for F
where
    F: Fn(TypedRequest) -> TypedResult<Out, E> + Send + Sync + 'static,
{
    fn handle(&self, req: TypedRequest) -> TypedResult<Out, E> {
        (self)(req)
    }
}

/// Business logic of an endpoint whose request body decodes into `In`.
pub trait BodyHandler<In, Out, E>: Send + Sync + 'static {
    fn handle(&self, req: TypedRequest<In>) -> TypedResult<Out, E>;
}

impl<In, Out, E, F> BodyHandler<In, Out, E> for F
where
    F: Fn(TypedRequest<In>) -> TypedResult<Out, E> + Send + Sync + 'static,
{
    fn handle(&self, req: TypedRequest<In>) -> TypedResult<Out, E> {
        (self)(req)
    }
}
