use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::ApiError;

/// Body of the fallback envelope
pub const FALLBACK_MESSAGE: &str = "Unknown Error, bad request";

/// Uniform `{statusCode, body}` result of every handler
///
/// `body` always holds serialized JSON, including for plain messages (which
/// are encoded as JSON strings) and errors (encoded as [`ErrorResponse`]).
///
/// [`ErrorResponse`]: crate::error::ErrorResponse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub status_code: u16,
    pub body: String,
}

impl Default for Envelope {
    /// 400 with a generic message. Only returned when a body could not be serialized.
    fn default() -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            body: JsonValue::from(FALLBACK_MESSAGE).to_string(),
        }
    }
}

impl Envelope {
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status_code: status.as_u16(),
                body,
            },
            Err(err) => {
                tracing::error!("Failed to serialize response body: {}", err);
                Self::default()
            }
        }
    }

    pub fn message(status: StatusCode, message: &str) -> Self {
        Self::json(status, message)
    }

    pub fn error(status: StatusCode, err: &ApiError) -> Self {
        Self::json(status, &err.to_response())
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;

    #[test]
    fn test_default_envelope() {
        let envelope = Envelope::default();

        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.body, "\"Unknown Error, bad request\"");
    }

    #[test]
    fn test_message_body_is_json_string() {
        let envelope = Envelope::message(StatusCode::CREATED, "Item created");

        assert_eq!(envelope.status_code, 201);
        let decoded: String = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(decoded, "Item created");
    }

    #[test]
    fn test_error_body_is_error_response() {
        let err = ApiError::NotFound("abc".to_string());
        let envelope = Envelope::error(StatusCode::BAD_REQUEST, &err);

        let decoded: ErrorResponse = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(decoded.error, "No item found with uuid abc");
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = Envelope::message(StatusCode::CREATED, "Item created").into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"\"Item created\"");
    }
}
