use crate::error::SchemaError;
use serde_json::Value;
use std::path::Path;

/// Avro-style record schema, used to check records before they leave the process.
///
/// Only the subset the generator produces is understood: primitive types,
/// nested records and unions of those.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    definition: Value,
}

impl RecordSchema {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let definition: Value = serde_json::from_str(text)?;
        if definition["type"] != "record" || !definition["fields"].is_array() {
            return Err(SchemaError::NotARecord(
                "top-level `type` must be \"record\" with a `fields` array".to_string(),
            ));
        }
        let name = definition["name"].as_str().unwrap_or("anonymous").to_string();
        Ok(Self { name, definition })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.definition["fields"]
            .as_array()
            .map(|fields| fields.iter().filter_map(|f| f["name"].as_str()).collect())
            .unwrap_or_default()
    }

    /// Check a serialized record against the schema.
    pub fn validate(&self, record: &Value) -> Result<(), SchemaError> {
        check_record(&self.definition, record, "")
    }
}

fn check_record(schema: &Value, value: &Value, path: &str) -> Result<(), SchemaError> {
    let obj = value.as_object().ok_or_else(|| SchemaError::TypeMismatch {
        field: display_path(path),
        expected: "record".to_string(),
        found: kind_of(value).to_string(),
    })?;

    let fields = schema["fields"]
        .as_array()
        .ok_or_else(|| SchemaError::NotARecord(display_path(path)))?;

    for field in fields {
        let name = field["name"]
            .as_str()
            .ok_or_else(|| SchemaError::NotARecord(format!("unnamed field in {}", display_path(path))))?;
        let field_path = if path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", path, name)
        };

        match obj.get(name) {
            Some(v) => check_type(&field["type"], v, &field_path)?,
            None if accepts_null(&field["type"]) || !field["default"].is_null() => {}
            None => return Err(SchemaError::MissingField(field_path)),
        }
    }
    Ok(())
}

fn check_type(ty: &Value, value: &Value, path: &str) -> Result<(), SchemaError> {
    match ty {
        Value::String(name) => check_primitive(name, value, path),
        Value::Object(_) if ty["type"] == "record" => check_record(ty, value, path),
        Value::Object(_) => check_type(&ty["type"], value, path),
        Value::Array(branches) => {
            if branches.iter().any(|b| check_type(b, value, path).is_ok()) {
                Ok(())
            } else {
                Err(SchemaError::TypeMismatch {
                    field: path.to_string(),
                    expected: ty.to_string(),
                    found: kind_of(value).to_string(),
                })
            }
        }
        other => Err(SchemaError::NotARecord(format!(
            "unsupported type {} at {}",
            other, path
        ))),
    }
}

fn check_primitive(name: &str, value: &Value, path: &str) -> Result<(), SchemaError> {
    let ok = match name {
        "double" | "float" => value.is_number(),
        "int" => value.as_i64().is_some_and(|n| i32::try_from(n).is_ok()),
        "long" => value.is_i64(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => {
            return Err(SchemaError::NotARecord(format!(
                "unsupported type \"{}\" at {}",
                name, path
            )))
        }
    };

    if ok {
        Ok(())
    } else {
        Err(SchemaError::TypeMismatch {
            field: path.to_string(),
            expected: name.to_string(),
            found: kind_of(value).to_string(),
        })
    }
}

fn accepts_null(ty: &Value) -> bool {
    match ty {
        Value::String(s) => s == "null",
        Value::Array(branches) => branches.iter().any(accepts_null),
        _ => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "long",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "record",
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
