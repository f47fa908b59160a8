use std::env;
use std::fmt;
use std::str::FromStr;
use anyhow::{Context, Result};

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TABLE_NAME: &str = "ExampleTable";

/// Which [`ItemStore`](crate::store::ItemStore) implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!(
                "STORE_BACKEND must be one of: dynamodb, memory, got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::DynamoDb => f.write_str("dynamodb"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub region: String,
    pub table_name: String,
    pub dynamodb_endpoint: Option<String>,
    pub store_backend: StoreBackend,
    pub service_port: u16,
    pub service_host: String,
    /// Set when running inside the Lambda execution environment
    pub lambda_runtime_api: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region: DEFAULT_REGION.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            dynamodb_endpoint: None,
            store_backend: StoreBackend::DynamoDb,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
            lambda_runtime_api: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let region = env::var("REGION")
            .unwrap_or_else(|_| DEFAULT_REGION.to_string());

        let table_name = env::var("TABLE_NAME")
            .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string());

        let dynamodb_endpoint = env::var("DYNAMODB_ENDPOINT").ok();

        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "dynamodb".to_string())
            .parse::<StoreBackend>()?;

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let lambda_runtime_api = env::var("AWS_LAMBDA_RUNTIME_API").ok();

        Ok(Config {
            region,
            table_name,
            dynamodb_endpoint,
            store_backend,
            service_port,
            service_host,
            lambda_runtime_api,
        })
    }

    pub fn is_lambda(&self) -> bool {
        self.lambda_runtime_api.is_some()
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {}", self.store_backend);
        tracing::info!("  Region: {}", self.region);
        tracing::info!("  Table: {}", self.table_name);
        tracing::info!("  DynamoDB endpoint: {}",
            self.dynamodb_endpoint.as_deref().unwrap_or("default (AWS)"));
        if self.is_lambda() {
            tracing::info!("  Running under the Lambda runtime");
        } else {
            tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
        }
    }
}
