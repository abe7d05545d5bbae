//! Result normalization for stored `context` attributes.
//!
//! Context is persisted as a JSON string because node properties cannot hold
//! nested maps. These helpers turn it back into structure on the read path.
//! Read paths prefer partial data over failure, so bad JSON never errors.

use serde_json::{Map, Value};

use memlink_core::OutputFormat;

use crate::client::Record;

const CONTEXT: &str = "context";

/// Shape a record for the requested output format.
pub fn format_record(record: Record, format: OutputFormat) -> Value {
    match format {
        OutputFormat::Records => Value::Object(record),
        OutputFormat::Json => Value::Object(normalize_record(record)),
    }
}

/// Decode string `context` attributes in every column of a record.
pub fn normalize_record(mut record: Record) -> Record {
    for value in record.values_mut() {
        decode_context_in_place(value);
    }
    record
}

/// Decode a string `context` held directly by `value` or by its
/// `properties` map (the converted form of a node or relationship).
///
/// Strings that fail to parse are left as they are.
pub fn decode_context_in_place(value: &mut Value) {
    let Value::Object(obj) = value else {
        return;
    };
    decode_field(obj);
    if let Some(Value::Object(props)) = obj.get_mut("properties") {
        decode_field(props);
    }
}

fn decode_field(obj: &mut Map<String, Value>) {
    let Some(Value::String(raw)) = obj.get(CONTEXT) else {
        return;
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => {
            obj.insert(CONTEXT.to_string(), parsed);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Leaving undecodable context as a string");
        }
    }
}

/// Parse a snapshot node's context.
///
/// Absent or null becomes `{}`, a valid JSON string is decoded, a malformed
/// string is wrapped as `{"raw": <string>}`, and anything already structured
/// passes through.
pub fn snapshot_context(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(Value::String(raw)) => serde_json::from_str(raw).unwrap_or_else(|_| {
            let mut wrapped = Map::new();
            wrapped.insert("raw".to_string(), Value::String(raw.clone()));
            Value::Object(wrapped)
        }),
        Some(other) => other.clone(),
    }
}
