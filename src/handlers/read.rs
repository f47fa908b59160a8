use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorResponse};
use crate::models::ReadQuery;
use crate::routes;
use crate::state::AppState;
use axum::extract::{rejection::QueryRejection, Query, State};
use axum::http::StatusCode;

/// GET /lambda-integration handler - Read one item or every item
///
/// With a `uuid` query parameter the single matching item is returned.
/// Without it the whole table is scanned, following every page.
/// Any failure, including a missing key, is reported as 400.
#[utoipa::path(
    get,
    path = routes::LAMBDA_INTEGRATION,
    params(
        ("uuid" = Option<String>, Query, description = "Key of the item to fetch; omit to list all items")
    ),
    responses(
        (status = 200, description = "The item, or an array of every item", body = serde_json::Value),
        (status = 400, description = "Item not found or store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn read_handler(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Envelope {
    let query: ReadQuery = match query {
        Ok(Query(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => {
            let err = ApiError::BadRequest(rejection.body_text());
            tracing::warn!("Rejected read request: {}", err);
            return Envelope::error(StatusCode::BAD_REQUEST, &err);
        }
    };

    match query.key() {
        Some(uuid) => read_one(&state, uuid).await,
        None => read_all(&state).await,
    }
}

async fn read_one(state: &AppState, uuid: &str) -> Envelope {
    match state.store.get_by_key(uuid).await {
        Ok(item) => {
            tracing::info!("Successfully retrieved item with uuid: {}", uuid);
            Envelope::json(StatusCode::OK, &item)
        }
        Err(err) => {
            let err = ApiError::from(err);
            match &err {
                ApiError::NotFound(_) => tracing::info!("Item not found with uuid: {}", uuid),
                _ => tracing::error!("Failed to read item {}: {}", uuid, err),
            }
            Envelope::error(StatusCode::BAD_REQUEST, &err)
        }
    }
}

async fn read_all(state: &AppState) -> Envelope {
    match state.store.get_all().await {
        Ok(items) => {
            tracing::info!("Listed {} items", items.len());
            Envelope::json(StatusCode::OK, &items)
        }
        Err(err) => {
            let err = ApiError::from(err);
            tracing::error!("Failed to list items: {}", err);
            Envelope::error(StatusCode::BAD_REQUEST, &err)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::router;
    use crate::config::Config;
    use crate::error::ErrorResponse;
    use crate::models::Item;
    use crate::state::AppState;
    use crate::store::{FailingStore, ItemStore, MemoryStore};
    use axum::{body::{Body, Bytes}, http::Request, http::StatusCode, Router};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn setup_test_app(store: Arc<dyn ItemStore>) -> Router {
        let state = AppState {
            store,
            config: Arc::new(Config::default()),
        };

        router(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_read_by_uuid_success() {
        let store = MemoryStore::new();
        let stored = Item::new("abc")
            .with("value1", json!("hello"))
            .with("value2", json!(42));
        store.put(stored.clone()).await.unwrap();
        let app = setup_test_app(Arc::new(store));

        let (status, body) = get(app, "/lambda-integration?uuid=abc").await;

        assert_eq!(status, StatusCode::OK);
        let item: Item = serde_json::from_slice(&body).unwrap();
        assert_eq!(item, stored);
    }

    #[tokio::test]
    async fn test_read_by_uuid_not_found_is_bad_request() {
        let app = setup_test_app(Arc::new(MemoryStore::new()));

        let (status, body) = get(app, "/lambda-integration?uuid=missing").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("No item found"));
        assert!(error_response.error.contains("missing"));
    }

    #[tokio::test]
    async fn test_read_by_uuid_is_repeatable() {
        let store = MemoryStore::new();
        store
            .put(Item::new("abc").with("value1", json!("same")))
            .await
            .unwrap();
        let app = setup_test_app(Arc::new(store));

        let (_, first) = get(app.clone(), "/lambda-integration?uuid=abc").await;
        let (_, second) = get(app, "/lambda-integration?uuid=abc").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_read_all_spans_multiple_pages() {
        let store = MemoryStore::with_page_size(2);
        for n in 0..7 {
            store
                .put(Item::new(format!("item-{}", n)).with("value2", json!(n)))
                .await
                .unwrap();
        }
        let app = setup_test_app(Arc::new(store));

        let (status, body) = get(app, "/lambda-integration").await;

        assert_eq!(status, StatusCode::OK);
        let items: Vec<Item> = serde_json::from_slice(&body).unwrap();
        assert_eq!(items.len(), 7);
        for n in 0..7 {
            let key = format!("item-{}", n);
            assert!(items.iter().any(|item| item.uuid() == Some(key.as_str())));
        }
    }

    #[tokio::test]
    async fn test_read_all_empty_store() {
        let app = setup_test_app(Arc::new(MemoryStore::new()));

        let (status, body) = get(app, "/lambda-integration").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_empty_uuid_lists_everything() {
        let store = MemoryStore::new();
        store.put(Item::new("abc")).await.unwrap();
        let app = setup_test_app(Arc::new(store));

        let (status, body) = get(app, "/lambda-integration?uuid=").await;

        assert_eq!(status, StatusCode::OK);
        let items: Vec<Item> = serde_json::from_slice(&body).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_uuid_uses_last_value() {
        let store = MemoryStore::new();
        store.put(Item::new("second")).await.unwrap();
        let app = setup_test_app(Arc::new(store));

        let (status, body) = get(app, "/lambda-integration?uuid=first&uuid=second").await;

        assert_eq!(status, StatusCode::OK);
        let item: Item = serde_json::from_slice(&body).unwrap();
        assert_eq!(item.uuid(), Some("second"));
    }

    #[tokio::test]
    async fn test_read_all_store_failure_is_bad_request() {
        let app = setup_test_app(Arc::new(FailingStore));

        let (status, body) = get(app, "/lambda-integration").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.contains("ProvisionedThroughputExceeded"));
    }

    #[tokio::test]
    async fn test_read_by_uuid_store_failure_is_bad_request() {
        let app = setup_test_app(Arc::new(FailingStore));

        let (status, body) = get(app, "/lambda-integration?uuid=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.error.starts_with("Store error"));
    }
}
