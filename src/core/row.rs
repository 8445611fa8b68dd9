use crate::core::{Result, SyncError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// A concrete payload: physical column name to value.
pub type Payload = serde_json::Map<String, JsonValue>;

/// Scalar row identifier. Deployments use either integer or text keys;
/// both hash so the coalescer can key its timer and sequence maps on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    /// Extract an identifier from a raw field value. Only non-null scalars
    /// qualify; floats, booleans, arrays and objects never identify a row.
    pub fn from_value(value: &JsonValue) -> Option<RowId> {
        match value {
            JsonValue::Number(n) => n.as_i64().map(RowId::Int),
            JsonValue::String(s) if !s.is_empty() => Some(RowId::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> JsonValue {
        match self {
            RowId::Int(n) => JsonValue::from(*n),
            RowId::Text(s) => JsonValue::from(s.clone()),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{n}"),
            RowId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Int(n)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}

/// An entity row: an open-ended mapping from field name to value.
///
/// Rows are whatever the authoritative read projection returns. The engine
/// never assumes a fixed schema; the only structural requirement is that a
/// loaded row resolves to exactly one identifier via [`Row::resolve_id`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Payload,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: &str, value: JsonValue) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn fields(&self) -> &Payload {
        &self.fields
    }

    pub fn into_fields(self) -> Payload {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve the row's identifier by trying `id_columns` in priority order
    /// and taking the first non-null hit.
    pub fn resolve_id(&self, id_columns: &[String]) -> Result<RowId> {
        for column in id_columns {
            if let Some(value) = self.fields.get(column)
                && let Some(id) = RowId::from_value(value)
            {
                return Ok(id);
            }
        }
        Err(SyncError::UnresolvedId {
            tried: id_columns.join(", "),
        })
    }
}

impl From<Payload> for Row {
    fn from(fields: Payload) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_row_id_from_scalar_values() {
        assert_eq!(RowId::from_value(&json!(42)), Some(RowId::Int(42)));
        assert_eq!(
            RowId::from_value(&json!("c-17")),
            Some(RowId::Text("c-17".to_string()))
        );
        assert_eq!(RowId::from_value(&json!(null)), None);
        assert_eq!(RowId::from_value(&json!("")), None);
        assert_eq!(RowId::from_value(&json!(1.5)), None);
        assert_eq!(RowId::from_value(&json!(true)), None);
    }

    #[test]
    fn test_resolve_id_priority_order() {
        let mut row = Row::new();
        row.set("id", json!(9));
        row.set("company_id", json!(3));

        let id = row.resolve_id(&columns(&["company_id", "id"])).unwrap();
        assert_eq!(id, RowId::Int(3));
    }

    #[test]
    fn test_resolve_id_skips_null_hit() {
        let mut row = Row::new();
        row.set("company_id", json!(null));
        row.set("id", json!(9));

        let id = row.resolve_id(&columns(&["company_id", "id"])).unwrap();
        assert_eq!(id, RowId::Int(9));
    }

    #[test]
    fn test_resolve_id_exhausted() {
        let mut row = Row::new();
        row.set("name", json!("Acme"));

        let err = row.resolve_id(&columns(&["company_id", "id"])).unwrap_err();
        assert!(matches!(err, SyncError::UnresolvedId { .. }));
    }

    #[test]
    fn test_row_round_trips_through_serde() {
        let mut row = Row::new();
        row.set("id", json!(1));
        row.set("name", json!("Acme"));

        let text = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&text).unwrap();
        assert_eq!(back, row);
    }
}
