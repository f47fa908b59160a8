use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

/// Name of the partition key attribute
pub const UUID_FIELD: &str = "uuid";

/// A single stored record: a flat JSON object keyed by its `uuid` field.
///
/// Everything other than `uuid` is opaque payload and passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, JsonValue>);

impl Item {
    pub fn new(uuid: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(UUID_FIELD.to_string(), JsonValue::String(uuid.into()));
        Self(fields)
    }

    /// Build the record persisted by the write path
    pub fn from_payload(uuid: impl Into<String>, payload: WritePayload) -> Self {
        let mut item = Self::new(uuid);
        if let Some(value1) = payload.value1 {
            item.insert("value1", JsonValue::String(value1));
        }
        if let Some(value2) = payload.value2 {
            item.insert("value2", JsonValue::Number(value2));
        }
        item
    }

    pub fn uuid(&self) -> Option<&str> {
        self.0.get(UUID_FIELD).and_then(JsonValue::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.0.insert(field.into(), value)
    }

    pub fn with(mut self, field: impl Into<String>, value: JsonValue) -> Self {
        self.insert(field, value);
        self
    }
}

impl From<Map<String, JsonValue>> for Item {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }
}

/// Body accepted by the write endpoint
///
/// `value1` is expected by callers but its presence is not enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WritePayload {
    #[serde(default)]
    pub value1: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub value2: Option<Number>,
}

/// Query parameters for the read endpoint
///
/// Built from the raw parameter pairs; a repeated `uuid` keeps its last value,
/// as API Gateway does for `queryStringParameters`. Unknown parameters are ignored.
#[derive(Debug, Default)]
pub struct ReadQuery {
    pub uuid: Option<String>,
}

impl FromIterator<(String, String)> for ReadQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let uuid = pairs
            .into_iter()
            .filter(|(name, _)| name == UUID_FIELD)
            .map(|(_, value)| value)
            .last();
        Self { uuid }
    }
}

impl ReadQuery {
    /// The requested key, treating an empty parameter as absent
    pub fn key(&self) -> Option<&str> {
        self.uuid.as_deref().filter(|uuid| !uuid.is_empty())
    }
}
