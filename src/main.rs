use std::sync::Arc;

use anyhow::Context;
use lambda_integration_api::{app, config::Config, state::AppState, store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config);

    tracing::info!("lambda-integration-api starting");
    config.log_startup();

    let store = store::connect(&config).await?;
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    if config.is_lambda() {
        // Invocations that exceed the function timeout are abandoned mid-call;
        // a put may or may not have landed.
        lambda_http::run(app::lambda_router(state))
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("Lambda runtime error")?;
    } else {
        let addr = format!("{}:{}", config.service_host, config.service_port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        tracing::info!("Listening on {}", addr);
        axum::serve(listener, app::router_with_docs(state))
            .await
            .context("Server error")?;
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.is_lambda() {
        // CloudWatch timestamps every line already
        builder.without_time().with_ansi(false).init();
    } else {
        builder.init();
    }
}
