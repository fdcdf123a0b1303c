use super::core::{BodyHandler, Handler, Outcome, TypedRequest, TypedResult};
use crate::codec::{Codec, JsonDecoder, JsonEncoder, RequestDecoder, ResponseEncoder};
use crate::server::{RawRequest, ResponseSink};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info_span};

/// Object-safe face of a typed handler, as stored by the router.
///
/// `serve` always ends with exactly one response written to `res`.
pub trait Endpoint: Send + Sync {
    fn serve(&self, req: RawRequest, res: &mut dyn ResponseSink);
}

/// Adapter for body-less handlers: `TypedRequest<()> -> TypedResult<Out, E>`.
///
/// Sequence per call: build the context, invoke the handler, encode either
/// the value or the error with the resolved status.
pub struct OutHandler<H, Out, E, D = JsonDecoder, En = JsonEncoder> {
    handler: H,
    codec: Arc<Codec<D, En>>,
    _marker: PhantomData<fn() -> (Out, E)>,
}

impl<F, Out, E, D, En> OutHandler<F, Out, E, D, En>
where
    F: Fn(TypedRequest) -> TypedResult<Out, E> + Send + Sync + 'static,
{
    /// Adapt a closure
    pub fn new(codec: Arc<Codec<D, En>>, handler: F) -> Self {
        Self::with_handler(codec, handler)
    }
}

impl<H, Out, E, D, En> OutHandler<H, Out, E, D, En> {
    /// Adapt any [`Handler`] implementation
    pub fn with_handler(codec: Arc<Codec<D, En>>, handler: H) -> Self {
        Self {
            handler,
            codec,
            _marker: PhantomData,
        }
    }
}

impl<H, Out, E, D, En> Endpoint for OutHandler<H, Out, E, D, En>
where
    H: Handler<Out, E>,
    Out: Serialize,
    E: Serialize,
    D: RequestDecoder,
    En: ResponseEncoder,
{
    fn serve(&self, req: RawRequest, res: &mut dyn ResponseSink) {
        let span = info_span!(
            "typed_handler",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            shape = "out"
        );
        let _guard = span.enter();

        let result = self.handler.handle(TypedRequest::new(req, ()));
        write_result(&self.codec, &result, res);
    }
}

/// Adapter for body-bearing handlers: `TypedRequest<In> -> TypedResult<Out, E>`.
///
/// The body is decoded before the handler runs; when decoding fails the
/// decoder has already answered 400 and the handler is never invoked.
///
/// Input types that should accept partial bodies, with absent fields left at
/// their zero value, derive `Default` and carry `#[serde(default)]`.
pub struct InOutHandler<H, In, Out, E, D = JsonDecoder, En = JsonEncoder> {
    handler: H,
    codec: Arc<Codec<D, En>>,
    _marker: PhantomData<fn() -> (In, Out, E)>,
}

impl<F, In, Out, E, D, En> InOutHandler<F, In, Out, E, D, En>
where
    F: Fn(TypedRequest<In>) -> TypedResult<Out, E> + Send + Sync + 'static,
{
    /// Adapt a closure
    pub fn new(codec: Arc<Codec<D, En>>, handler: F) -> Self {
        Self::with_handler(codec, handler)
    }
}

impl<H, In, Out, E, D, En> InOutHandler<H, In, Out, E, D, En> {
    /// Adapt any [`BodyHandler`] implementation
    pub fn with_handler(codec: Arc<Codec<D, En>>, handler: H) -> Self {
        Self {
            handler,
            codec,
            _marker: PhantomData,
        }
    }
}

impl<H, In, Out, E, D, En> Endpoint for InOutHandler<H, In, Out, E, D, En>
where
    H: BodyHandler<In, Out, E>,
    In: DeserializeOwned,
    Out: Serialize,
    E: Serialize,
    D: RequestDecoder,
    En: ResponseEncoder,
{
    fn serve(&self, req: RawRequest, res: &mut dyn ResponseSink) {
        let span = info_span!(
            "typed_handler",
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            shape = "in_out"
        );
        let _guard = span.enter();

        let body: In = match self.codec.decode(&req.body, res) {
            Ok(body) => body,
            Err(err) => {
                debug!(error = %err, status = err.status().as_u16(), "Handler skipped");
                return;
            }
        };

        let result = self.handler.handle(TypedRequest::new(req, body));
        write_result(&self.codec, &result, res);
    }
}

/// Encode the value or the error of `result` with its resolved status
fn write_result<Out, E, D, En>(
    codec: &Codec<D, En>,
    result: &TypedResult<Out, E>,
    res: &mut dyn ResponseSink,
) where
    Out: Serialize,
    E: Serialize,
    D: RequestDecoder,
    En: ResponseEncoder,
{
    let status = result.status_code();
    let encoded = match &result.outcome {
        Outcome::Value(value) => codec.encode(res, value, status),
        Outcome::Error(err) => codec.encode(res, err, status),
    };
    match encoded {
        Ok(()) => debug!(
            status = status.as_u16(),
            is_error = !result.is_ok(),
            "Handler response written"
        ),
        Err(err) => error!(
            error = %err,
            intended_status = status.as_u16(),
            "Handler response could not be encoded"
        ),
    }
}
