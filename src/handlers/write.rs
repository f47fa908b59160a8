use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::ids::generate_uuid;
use crate::models::{Item, WritePayload};
use crate::routes;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

pub const CREATED_MESSAGE: &str = "Item created";
pub const NO_PAYLOAD_MESSAGE: &str = "No payload in request";

/// POST /lambda-integration handler - Store a new item
///
/// The item key is always generated here, never taken from the caller.
/// A body that isn't valid JSON fails the invocation (502, as API Gateway
/// reports a crashed integration); a store failure is reported as 404.
#[utoipa::path(
    post,
    path = routes::LAMBDA_INTEGRATION,
    request_body = WritePayload,
    responses(
        (status = 201, description = "Item stored", body = String),
        (status = 400, description = "Missing request body", body = String),
        (status = 404, description = "Store error", body = ErrorResponse),
        (status = 502, description = "Request body is not valid JSON", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn write_handler(State(state): State<AppState>, body: Bytes) -> Envelope {
    if body.is_empty() {
        tracing::info!("Rejected write request without a body");
        return Envelope::message(StatusCode::BAD_REQUEST, NO_PAYLOAD_MESSAGE);
    }

    let payload: WritePayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            let err = ApiError::from(err);
            tracing::error!("Failed to parse write payload: {}", err);
            return Envelope::error(StatusCode::BAD_GATEWAY, &err);
        }
    };

    let uuid = generate_uuid();
    let item = Item::from_payload(uuid.clone(), payload);

    match state.store.put(item).await {
        Ok(()) => {
            tracing::info!("Successfully stored item with uuid: {}", uuid);
            Envelope::message(StatusCode::CREATED, CREATED_MESSAGE)
        }
        Err(err) => {
            let err = ApiError::from(err);
            tracing::error!("Failed to store item {}: {}", uuid, err);
            Envelope::error(StatusCode::NOT_FOUND, &err)
        }
    }
}
