// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const LAMBDA_INTEGRATION: &str = "/lambda-integration";

pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
