use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::WritePayload;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "lambda-integration-api",
        version = "1.0.0",
        description = "A minimal item API backed by a single DynamoDB table"
    ),
    paths(
        handlers::health::health_handler,
        handlers::read::read_handler,
        handlers::write::write_handler
    ),
    components(
        schemas(
            WritePayload,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "items", description = "Item read and write operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/health"));
        let item_path = doc.paths.paths.get("/lambda-integration").unwrap();
        assert!(item_path.get.is_some());
        assert!(item_path.post.is_some());
    }
}
