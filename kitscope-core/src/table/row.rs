//! Row records

use crate::value::Value;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Field read as the row identity when a row is built from a JSON object
pub const ID_FIELD: &str = "id";

/// One record of report data: an ordered mapping from column keys to values
///
/// Keys keep insertion order. Setting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct Row {
    id: Option<String>,
    cells: Vec<(String, Value)>,
}

static NULL: Value = Value::Null;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row with a stable identity used as a rendering key
    pub fn with_id(id: impl Into<String>) -> Self {
        Row {
            id: Some(id.into()),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value for `key`, or `Null` when the key is absent
    pub fn value(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Rendering key: the stable id when present, else the given position
    pub fn render_key(&self, position: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => position.to_string(),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let id = match map.get(ID_FIELD) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let cells = map.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
        Row { id, cells }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
