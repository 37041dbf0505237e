use crate::tree::*;
use serde_json::{Map, Value};

impl FormValue {
    /// Convert to a JSON value. `Undefined` and list padding become `null`; files become
    /// `{"name", "type", "size"}` since their bytes are not representable.
    pub fn to_json(&self) -> Value {
        match self {
            FormValue::Undefined | FormValue::Hole => Value::Null,
            FormValue::Text(s) => Value::String(s.clone()),
            FormValue::File(file) => file_to_json(file),
            FormValue::List(items) => Value::Array(items.iter().map(FormValue::to_json).collect()),
            FormValue::Map(map) => Value::Object(map_to_json(map)),
        }
    }
}

fn file_to_json(file: &FileBlob) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), Value::String(file.name.clone()));
    obj.insert(
        "type".to_string(),
        file.content_type.clone().map_or(Value::Null, Value::String),
    );
    obj.insert("size".to_string(), Value::from(file.size()));
    Value::Object(obj)
}

fn map_to_json(map: &std::collections::BTreeMap<String, FormValue>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

/// Convert a whole tree to a JSON object.
pub fn tree_to_json(tree: &FormTree) -> Value {
    Value::Object(map_to_json(tree))
}

/// Build a tree node from JSON. Form input is always text, so numbers and
/// booleans are kept as their textual spelling.
impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Undefined,
            Value::Bool(b) => FormValue::Text(b.to_string()),
            Value::Number(n) => FormValue::Text(n.to_string()),
            Value::String(s) => FormValue::Text(s),
            Value::Array(items) => FormValue::List(items.into_iter().map(FormValue::from).collect()),
            Value::Object(obj) => FormValue::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, FormValue::from(v)))
                    .collect(),
            ),
        }
    }
}
