use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};

use super::{ItemStore, ScanPage, StoreError};
use crate::config::Config;
use crate::models::{Item, UUID_FIELD};

type Attributes = HashMap<String, AttributeValue>;

/// Capacity used when provisioning the table against a local endpoint
const PROVISIONED_CAPACITY_UNITS: i64 = 5;

/// DynamoDB-backed [`ItemStore`]
///
/// Cheap to clone; the SDK client shares its connection pool between clones.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
    page_limit: Option<i32>,
}

impl DynamoStore {
    /// Create a DynamoDB client from configuration
    ///
    /// Credentials come from the default AWS provider chain. When
    /// `DYNAMODB_ENDPOINT` is set (DynamoDB Local), the table is created on
    /// startup if it doesn't exist yet.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.dynamodb_endpoint {
            tracing::info!("Connecting to DynamoDB endpoint at: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        } else {
            tracing::info!("Connecting to DynamoDB in region: {}", config.region);
        }

        let sdk_config = loader.load().await;
        let store = Self::new(Client::new(&sdk_config), &config.table_name);

        if config.dynamodb_endpoint.is_some() {
            store.ensure_table_exists().await?;
        }

        tracing::info!("Using DynamoDB table: {}", store.table_name);
        Ok(store)
    }

    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            page_limit: None,
        }
    }

    /// Cap the number of items evaluated per Scan call (DynamoDB's default is 1 MB of data)
    #[cfg(test)]
    pub(crate) fn with_page_limit(mut self, limit: i32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Create the table if it is missing: `uuid` string partition key, no sort key
    async fn ensure_table_exists(&self) -> Result<()> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!("Table '{}' already exists", self.table_name);
                return Ok(());
            }
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception());
                if !missing {
                    return Err(anyhow::anyhow!(
                        "Failed to describe table '{}': {}",
                        self.table_name,
                        DisplayErrorContext(&err)
                    ));
                }
            }
        }

        tracing::info!("Table '{}' not found, creating...", self.table_name);

        let key_schema = KeySchemaElement::builder()
            .attribute_name(UUID_FIELD)
            .key_type(KeyType::Hash)
            .build()
            .context("Failed to build key schema")?;

        let attribute = AttributeDefinition::builder()
            .attribute_name(UUID_FIELD)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .context("Failed to build attribute definition")?;

        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(PROVISIONED_CAPACITY_UNITS)
            .write_capacity_units(PROVISIONED_CAPACITY_UNITS)
            .build()
            .context("Failed to build provisioned throughput")?;

        self.client
            .create_table()
            .table_name(&self.table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute)
            .provisioned_throughput(throughput)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create table '{}': {}",
                    self.table_name,
                    DisplayErrorContext(&e)
                )
            })?;

        tracing::info!("Table '{}' created", self.table_name);
        Ok(())
    }
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn get_by_key(&self, uuid: &str) -> Result<Item, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(UUID_FIELD, AttributeValue::S(uuid.to_string()))
            .send()
            .await
            .map_err(|e| {
                StoreError::Backend(format!("DynamoDB GetItem failed: {}", DisplayErrorContext(&e)))
            })?;

        match output.item {
            Some(attributes) => {
                tracing::debug!("Read item with uuid: {}", uuid);
                decode_item(attributes)
            }
            None => Err(StoreError::NotFound {
                uuid: uuid.to_string(),
            }),
        }
    }

    async fn scan_page(&self, start: Option<String>) -> Result<ScanPage, StoreError> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_limit(self.page_limit);

        if let Some(start) = start {
            request = request.exclusive_start_key(UUID_FIELD, AttributeValue::S(start));
        }

        let output = request.send().await.map_err(|e| {
            StoreError::Backend(format!("DynamoDB Scan failed: {}", DisplayErrorContext(&e)))
        })?;

        let items = from_items(output.items.unwrap_or_default())
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        let next = continuation_token(output.last_evaluated_key)?;

        tracing::debug!("Scanned page of {} items (more: {})", items.len(), next.is_some());
        Ok(ScanPage { items, next })
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let attributes = encode_item(&item)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| {
                StoreError::Backend(format!("DynamoDB PutItem failed: {}", DisplayErrorContext(&e)))
            })?;

        tracing::debug!("Put item with uuid: {}", item.uuid().unwrap_or_default());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| {
                StoreError::Backend(format!(
                    "DynamoDB DescribeTable failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}

fn encode_item(item: &Item) -> Result<Attributes, StoreError> {
    if item.uuid().is_none() {
        return Err(StoreError::MissingKey);
    }
    to_item(item).map_err(|e| StoreError::Codec(e.to_string()))
}

fn decode_item(attributes: Attributes) -> Result<Item, StoreError> {
    from_item(attributes).map_err(|e| StoreError::Codec(e.to_string()))
}

/// Extract the `uuid` of `LastEvaluatedKey`; an absent or empty key ends the scan
fn continuation_token(last_evaluated_key: Option<Attributes>) -> Result<Option<String>, StoreError> {
    match last_evaluated_key {
        Some(key) if !key.is_empty() => match key.get(UUID_FIELD) {
            Some(AttributeValue::S(uuid)) => Ok(Some(uuid.clone())),
            _ => Err(StoreError::Codec(
                "LastEvaluatedKey has no string uuid attribute".to_string(),
            )),
        },
        _ => Ok(None),
    }
}
