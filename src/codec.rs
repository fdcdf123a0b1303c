//! # Codec Module
//!
//! Encode/decode strategy shared by every typed handler adapter.
//!
//! ## Overview
//!
//! A [`Codec`] pairs a [`RequestDecoder`] with a [`ResponseEncoder`]. It is
//! built once at startup, wrapped in an `Arc` and handed to each adapter, so
//! the wire format is configuration rather than mutable global state. The two
//! halves can be replaced independently:
//!
//! ```rust
//! use mplex::codec::{Codec, JsonEncoder};
//! use std::sync::Arc;
//!
//! let codec = Arc::new(Codec::json());
//! let same = Codec::json().with_encoder(JsonEncoder);
//! # let _ = (codec, same);
//! ```
//!
//! ## Failure Contract
//!
//! A decoder or encoder that fails has already written the failure response
//! (400 for decode, 500 for encode) to the sink when it returns `Err`. The
//! adapter only stops processing; it never writes a second response.

use crate::server::response::{write_json_error, ContentType, ResponseSink};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, warn};

/// Decode or encode failure, after the failure response has been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The request body could not be turned into the handler's input type
    Decode { message: String },
    /// The handler's output could not be serialized
    Encode { message: String },
}

impl CodecError {
    /// Status code of the response written for this failure
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            CodecError::Decode { .. } => StatusCode::BAD_REQUEST,
            CodecError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Decode { message } => write!(f, "request body decode failed: {message}"),
            CodecError::Encode { message } => write!(f, "response encode failed: {message}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Turns a raw request body into a typed value.
pub trait RequestDecoder: Send + Sync + 'static {
    /// Decode `body` into `T`.
    ///
    /// # Errors
    ///
    /// On failure the implementation writes a 400-class response to `res`
    /// before returning the error.
    fn decode<T: DeserializeOwned>(
        &self,
        body: &[u8],
        res: &mut dyn ResponseSink,
    ) -> Result<T, CodecError>;
}

/// Serializes a typed value as the response body.
pub trait ResponseEncoder: Send + Sync + 'static {
    /// Write `value` with `status` to `res`.
    ///
    /// # Errors
    ///
    /// On failure the implementation writes a 500-class response to `res`
    /// before returning the error.
    fn encode<T: Serialize + ?Sized>(
        &self,
        res: &mut dyn ResponseSink,
        value: &T,
        status: StatusCode,
    ) -> Result<(), CodecError>;
}

/// Standard 400 answer for a body that could not be decoded
pub fn write_decode_failure(res: &mut dyn ResponseSink, message: &str) {
    write_json_error(
        res,
        StatusCode::BAD_REQUEST,
        json!({
            "error": "Invalid request body",
            "message": message
        }),
    );
}

/// Standard 500 answer for an output that could not be encoded
pub fn write_encode_failure(res: &mut dyn ResponseSink) {
    write_json_error(
        res,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Failed to encode response" }),
    );
}

/// `serde_json` request decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl RequestDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(
        &self,
        body: &[u8],
        res: &mut dyn ResponseSink,
    ) -> Result<T, CodecError> {
        match serde_json::from_slice::<T>(body) {
            Ok(value) => {
                debug!(body_size_bytes = body.len(), "JSON body decoded");
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    body_size_bytes = body.len(),
                    error = %message,
                    "JSON body decode failed"
                );
                write_decode_failure(res, &message);
                Err(CodecError::Decode { message })
            }
        }
    }
}

/// `serde_json` response encoder, sets `Content-Type: application/json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ResponseEncoder for JsonEncoder {
    fn encode<T: Serialize + ?Sized>(
        &self,
        res: &mut dyn ResponseSink,
        value: &T,
        status: StatusCode,
    ) -> Result<(), CodecError> {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                res.write(status, ContentType::Json, bytes);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    status = status.as_u16(),
                    error = %message,
                    "JSON response encode failed"
                );
                write_encode_failure(res);
                Err(CodecError::Encode { message })
            }
        }
    }
}

/// Decoder/encoder pair used by the handler adapters
#[derive(Debug, Clone, Default)]
pub struct Codec<D = JsonDecoder, En = JsonEncoder> {
    decoder: D,
    encoder: En,
}

impl Codec {
    /// JSON in, JSON out
    #[must_use]
    pub fn json() -> Self {
        Self {
            decoder: JsonDecoder,
            encoder: JsonEncoder,
        }
    }
}

impl<D: RequestDecoder, En: ResponseEncoder> Codec<D, En> {
    pub fn new(decoder: D, encoder: En) -> Self {
        Self { decoder, encoder }
    }

    /// Replace the decoding half, keeping the encoder
    pub fn with_decoder<D2: RequestDecoder>(self, decoder: D2) -> Codec<D2, En> {
        Codec {
            decoder,
            encoder: self.encoder,
        }
    }

    /// Replace the encoding half, keeping the decoder
    pub fn with_encoder<En2: ResponseEncoder>(self, encoder: En2) -> Codec<D, En2> {
        Codec {
            decoder: self.decoder,
            encoder,
        }
    }

    /// See [`RequestDecoder::decode`]
    ///
    /// # Errors
    ///
    /// Propagates the decoder's failure; the 400 is already written.
    pub fn decode<T: DeserializeOwned>(
        &self,
        body: &[u8],
        res: &mut dyn ResponseSink,
    ) -> Result<T, CodecError> {
        self.decoder.decode(body, res)
    }

    /// See [`ResponseEncoder::encode`]
    ///
    /// # Errors
    ///
    /// Propagates the encoder's failure; the 500 is already written.
    pub fn encode<T: Serialize + ?Sized>(
        &self,
        res: &mut dyn ResponseSink,
        value: &T,
        status: StatusCode,
    ) -> Result<(), CodecError> {
        self.encoder.encode(res, value, status)
    }
}
