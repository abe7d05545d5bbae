//! Conversion between Bolt values and JSON.
//!
//! Bolt integers are 64-bit. JSON consumers commonly parse numbers as
//! doubles, so integers outside the double-safe range are emitted as their
//! exact decimal string instead.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};
use neo4rs::{
    BoltDateTimeZoneId, BoltDuration, BoltList, BoltMap, BoltNode, BoltNull, BoltPath,
    BoltRelation, BoltString, BoltType, BoltUnboundedRelation, Row,
};
use serde_json::{Map, Value};

use crate::client::{GraphError, Record};

/// Largest integer a double represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Convert a 64-bit integer to a JSON number when it fits a double exactly,
/// otherwise to its decimal string.
pub fn integer_to_json(value: i64) -> Value {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value) {
        Value::from(value)
    } else {
        Value::String(value.to_string())
    }
}

fn float_to_json(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

/// Convert any Bolt value to JSON.
///
/// Nodes become `{id, labels, properties}`, relationships
/// `{id, type, start, end, properties}` and paths `{nodes, relationships}`.
/// Temporal values become ISO-8601 strings. Spatial and byte values fall
/// back to their debug rendering.
pub fn bolt_to_json(value: &BoltType) -> Value {
    match value {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Bool(b.value),
        BoltType::Integer(i) => integer_to_json(i.value),
        BoltType::Float(f) => float_to_json(f.value),
        BoltType::String(s) => Value::String(s.value.clone()),
        BoltType::List(list) => Value::Array(list.value.iter().map(bolt_to_json).collect()),
        BoltType::Map(map) => Value::Object(map_to_json(map)),
        BoltType::Node(node) => node_to_json(node),
        BoltType::Relation(rel) => relation_to_json(rel),
        BoltType::UnboundedRelation(rel) => unbounded_relation_to_json(rel),
        BoltType::Path(path) => path_to_json(path),
        BoltType::Date(_)
        | BoltType::Time(_)
        | BoltType::LocalTime(_)
        | BoltType::DateTime(_)
        | BoltType::LocalDateTime(_)
        | BoltType::DateTimeZoneId(_)
        | BoltType::Duration(_) => temporal_to_json(value),
        other => Value::String(format!("{other:?}")),
    }
}

fn map_to_json(map: &BoltMap) -> Map<String, Value> {
    map.value
        .iter()
        .map(|(k, v)| (k.value.clone(), bolt_to_json(v)))
        .collect()
}

fn node_to_json(node: &BoltNode) -> Value {
    let mut out = Map::new();
    out.insert("id".to_string(), integer_to_json(node.id.value));
    out.insert(
        "labels".to_string(),
        Value::Array(node.labels.value.iter().map(bolt_to_json).collect()),
    );
    out.insert(
        "properties".to_string(),
        Value::Object(map_to_json(&node.properties)),
    );
    Value::Object(out)
}

fn relation_to_json(rel: &BoltRelation) -> Value {
    let mut out = Map::new();
    out.insert("id".to_string(), integer_to_json(rel.id.value));
    out.insert("type".to_string(), Value::String(rel.typ.value.clone()));
    out.insert(
        "start".to_string(),
        integer_to_json(rel.start_node_id.value),
    );
    out.insert("end".to_string(), integer_to_json(rel.end_node_id.value));
    out.insert(
        "properties".to_string(),
        Value::Object(map_to_json(&rel.properties)),
    );
    Value::Object(out)
}

fn unbounded_relation_to_json(rel: &BoltUnboundedRelation) -> Value {
    let mut out = Map::new();
    out.insert("id".to_string(), integer_to_json(rel.id.value));
    out.insert("type".to_string(), Value::String(rel.typ.value.clone()));
    out.insert(
        "properties".to_string(),
        Value::Object(map_to_json(&rel.properties)),
    );
    Value::Object(out)
}

fn path_to_json(path: &BoltPath) -> Value {
    let mut out = Map::new();
    out.insert(
        "nodes".to_string(),
        Value::Array(path.nodes.value.iter().map(bolt_to_json).collect()),
    );
    out.insert(
        "relationships".to_string(),
        Value::Array(path.rels.value.iter().map(bolt_to_json).collect()),
    );
    Value::Object(out)
}

fn temporal_to_json(value: &BoltType) -> Value {
    let rendered = match value {
        BoltType::Date(d) => NaiveDate::try_from(d).map(|d| d.to_string()).ok(),
        BoltType::Time(t) => {
            let (time, offset): (NaiveTime, FixedOffset) = t.into();
            Some(format!("{}{offset}", time.format("%H:%M:%S%.f")))
        }
        BoltType::LocalTime(t) => Some(NaiveTime::from(t).format("%H:%M:%S%.f").to_string()),
        BoltType::DateTime(dt) => DateTime::<FixedOffset>::try_from(dt)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .ok(),
        BoltType::LocalDateTime(dt) => NaiveDateTime::try_from(dt)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            .ok(),
        BoltType::DateTimeZoneId(dt) => zoned_to_string(dt),
        BoltType::Duration(d) => Some(duration_to_iso(d)),
        _ => None,
    };
    rendered
        .map(Value::String)
        .unwrap_or_else(|| Value::String(format!("{value:?}")))
}

fn zoned_to_string(dt: &BoltDateTimeZoneId) -> Option<String> {
    let local = DateTime::<FixedOffset>::try_from(dt).ok()?;
    Some(format!(
        "{}[{}]",
        local.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        dt.tz_id()
    ))
}

/// Months and days are folded into seconds by the driver.
fn duration_to_iso(d: &BoltDuration) -> String {
    let d = std::time::Duration::from(d.clone());
    match d.subsec_nanos() {
        0 => format!("PT{}S", d.as_secs()),
        nanos => {
            let frac = format!("{nanos:09}");
            format!("PT{}.{}S", d.as_secs(), frac.trim_end_matches('0'))
        }
    }
}

/// Convert a JSON parameter to a Bolt value for binding.
pub fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        // Unsigned values beyond i64 are bound as exact decimal strings.
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => BoltType::from(i),
            (None, Some(u)) => BoltType::from(u.to_string()),
            (None, None) => BoltType::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(fields) => {
            let mut map = BoltMap::new();
            for (k, v) in fields {
                map.put(BoltString::from(k.as_str()), json_to_bolt(v));
            }
            BoltType::Map(map)
        }
    }
}

/// Convert a result row into a column-to-JSON record.
pub fn row_to_record(row: &Row) -> Result<Record, GraphError> {
    let columns: BoltMap = row
        .to_strict()
        .map_err(|e| GraphError::Serialization(format!("Failed to read row: {e}")))?;
    Ok(map_to_json(&columns))
}
