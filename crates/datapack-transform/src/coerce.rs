use datapack_model::SchemaType;
use serde_json::Value;

/// Spellings accepted as boolean true and false. Anything else in a
/// boolean column reads as null.
const TRUTHY: &[&str] = &["1", "Yes", "YES", "yes", "True", "TRUE", "true"];
const FALSY: &[&str] = &["0", "No", "NO", "no", "False", "FALSE", "false"];

/// Null-equivalent cell spellings: the exact spreadsheet artifact
/// `nan`, anything containing `NA` (the census suppression marker,
/// case-sensitive on purpose), and any spelling of infinity.
pub fn is_sentinel(raw: &str) -> bool {
    raw == "nan" || raw.contains("NA") || raw.to_ascii_lowercase().contains("inf")
}

/// Coerce one cell to its schema type.
///
/// `Some(Value::Null)` is a legitimate null (sentinel or unmatched
/// boolean spelling); `None` means the value could not be interpreted
/// at all and the caller should record a warning alongside the null.
pub fn coerce_value(raw: &str, schema_type: SchemaType) -> Option<Value> {
    if is_sentinel(raw) {
        return Some(Value::Null);
    }
    match schema_type {
        SchemaType::String => Some(Value::String(raw.to_string())),
        SchemaType::Integer => parse_integer(raw).map(Value::from),
        SchemaType::Number => parse_number(raw).map(Value::from),
        SchemaType::Boolean => Some(coerce_boolean(raw)),
    }
}

/// Integer columns tolerate decimal renderings like `23493.3434`,
/// rounding half away from zero.
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(whole) = trimmed.parse::<i64>() {
        return Some(whole);
    }
    let number = trimmed.parse::<f64>().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some(number.round() as i64)
}

fn parse_number(raw: &str) -> Option<f64> {
    let number = raw.trim().parse::<f64>().ok()?;
    number.is_finite().then_some(number)
}

fn coerce_boolean(raw: &str) -> Value {
    if TRUTHY.contains(&raw) {
        Value::Bool(true)
    } else if FALSY.contains(&raw) {
        Value::Bool(false)
    } else {
        Value::Null
    }
}

/// Left-pad with zeros to `width` characters. Identifier columns lose
/// leading zeros in spreadsheet round-trips; this restores them.
pub fn zero_fill(raw: &str, width: usize) -> String {
    let length = raw.chars().count();
    if length >= width {
        raw.to_string()
    } else {
        let mut padded = "0".repeat(width - length);
        padded.push_str(raw);
        padded
    }
}
