//! Typed model of the provider's `responseSchema` (an OpenAPI subset).
//!
//! The same schema value is sent with the request and, in strict mode, used
//! to check the decoded response.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    String,
    Integer,
    Array,
    Object,
}

impl SchemaType {
    fn as_str(self) -> &'static str {
        match self {
            SchemaType::String => "STRING",
            SchemaType::Integer => "INTEGER",
            SchemaType::Array => "ARRAY",
            SchemaType::Object => "OBJECT",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            SchemaType::String => value.is_string(),
            SchemaType::Integer => value.is_i64() || value.is_u64(),
            SchemaType::Array => value.is_array(),
            SchemaType::Object => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    /// Declaration order of `properties`; the provider emits fields in this order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            items: None,
            properties: BTreeMap::new(),
            property_ordering: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// An object whose every listed property is required.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let mut schema = Self::of(SchemaType::Object);
        for (name, property) in properties {
            let name = name.into();
            schema.property_ordering.push(name.clone());
            schema.required.push(name.clone());
            schema.properties.insert(name, property);
        }
        schema
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Lists every place where `value` departs from this schema. Empty means
    /// the value conforms.
    pub fn violations(&self, value: &Value) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_violations(value, "", &mut found);
        found
    }

    fn collect_violations(&self, value: &Value, path: &str, found: &mut Vec<String>) {
        if !self.kind.matches(value) {
            let at = if path.is_empty() { "(root)" } else { path };
            found.push(format!(
                "{at}: expected {}, found {}",
                self.kind.as_str(),
                json_kind(value)
            ));
            return;
        }

        match value {
            Value::Array(elements) => {
                if let Some(items) = &self.items {
                    for (i, element) in elements.iter().enumerate() {
                        items.collect_violations(element, &format!("{path}[{i}]"), found);
                    }
                }
            }
            Value::Object(fields) => {
                for name in &self.required {
                    if !fields.contains_key(name) {
                        found.push(format!("{}: missing required field", join(path, name)));
                    }
                }
                for (name, property) in &self.properties {
                    if let Some(field) = fields.get(name) {
                        property.collect_violations(field, &join(path, name), found);
                    }
                }
            }
            _ => {}
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
