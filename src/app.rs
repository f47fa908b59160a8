use axum::{http::Uri, routing::get, Router};
use lambda_http::request::RequestContext;
use lambda_http::{Request as LambdaRequest, RequestExt};
use tower::util::MapRequest;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{health_handler, read_handler, write_handler};
use crate::routes;
use crate::state::AppState;

/// Router serving the item API, shared by the Lambda and local entry points
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(
            routes::LAMBDA_INTEGRATION,
            get(read_handler).post(write_handler),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// [`router`] as served by the Lambda runtime
///
/// REST API events reach the function with the stage as the first path
/// segment (`/default/lambda-integration`); it is removed before routing.
pub fn lambda_router(state: AppState) -> MapRequest<Router, fn(LambdaRequest) -> LambdaRequest> {
    MapRequest::new(router(state), strip_stage_prefix as fn(LambdaRequest) -> LambdaRequest)
}

fn strip_stage_prefix(mut request: LambdaRequest) -> LambdaRequest {
    let stage = match request.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(context)) => context.stage.clone(),
        _ => None,
    };

    if let Some(uri) = stage.and_then(|stage| unstaged_uri(request.uri(), &stage)) {
        tracing::debug!("Routing {} without stage prefix", uri.path());
        *request.uri_mut() = uri;
    }
    request
}

fn unstaged_uri(uri: &Uri, stage: &str) -> Option<Uri> {
    let rest = uri.path().strip_prefix('/')?.strip_prefix(stage)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    let path = if rest.is_empty() { "/" } else { rest };
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

/// [`router`] plus Swagger UI, for running outside Lambda
pub fn router_with_docs(state: AppState) -> Router {
    router(state).merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
}
