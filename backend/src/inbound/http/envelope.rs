//! JSON envelope shared by every endpoint.
//!
//! Successful responses carry `{"ok": true, "data": ...}`; failures are
//! rendered by the `ResponseError` impl in [`super::error`] as
//! `{"ok": false, "error": ...}`.

use actix_web::HttpResponse;
use serde::Serialize;

/// Success envelope wrapping a response payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true` on the success path.
    pub ok: bool,
    /// The endpoint-specific payload.
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload in the success envelope.
    pub fn data(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// 200 response with an enveloped payload.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::data(data))
}

/// 201 response with an enveloped payload.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::data(data))
}
