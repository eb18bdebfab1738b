//! Tagged-value codec.
//!
//! Converts a flat map of typed field values to and from the store's wire
//! representation. Decoding never reconstructs timestamps: a `timestampValue`
//! comes back as [`FieldValue::Text`] holding the exact wire text, and callers
//! that need structured time parse it themselves.

use crate::error::{CodecError, CodecResult};
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const STRING_TAG: &str = "stringValue";
const BOOLEAN_TAG: &str = "booleanValue";
const INTEGER_TAG: &str = "integerValue";
const DOUBLE_TAG: &str = "doubleValue";
const TIMESTAMP_TAG: &str = "timestampValue";

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// UTF-8 text.
    Text(String),
    /// Boolean flag.
    Boolean(bool),
    /// Signed 64-bit integer, sent as decimal text.
    Integer(i64),
    /// Double-precision float.
    Float(f64),
    /// Naive UTC date-time.
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Returns the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// Field name to typed value, as handed to [`encode`].
pub type Fields = BTreeMap<String, FieldValue>;

/// Field name to decoded value. `None` marks a field whose tag was not recognized.
pub type DecodedFields = BTreeMap<String, Option<FieldValue>>;

#[derive(Serialize)]
enum WireValue {
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "integerValue")]
    Integer(String),
    #[serde(rename = "doubleValue")]
    Double(WireDouble),
    #[serde(rename = "timestampValue")]
    Timestamp(String),
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireDouble {
    Number(f64),
    Text(&'static str),
}

#[derive(Serialize)]
struct WireDocument {
    fields: BTreeMap<String, WireValue>,
}

impl From<&FieldValue> for WireValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Self::String(s.clone()),
            FieldValue::Boolean(b) => Self::Boolean(*b),
            FieldValue::Integer(i) => Self::Integer(i.to_string()),
            FieldValue::Float(f) => Self::Double(wire_double(*f)),
            // The suffix is appended unconditionally; stored documents rely on it.
            FieldValue::Timestamp(ts) => Self::Timestamp(format!("{}Z", format_timestamp(ts))),
        }
    }
}

/// JSON has no literal for non-finite numbers.
fn wire_double(value: f64) -> WireDouble {
    if value.is_nan() {
        WireDouble::Text("NaN")
    } else if value == f64::INFINITY {
        WireDouble::Text("Infinity")
    } else if value == f64::NEG_INFINITY {
        WireDouble::Text("-Infinity")
    } else {
        WireDouble::Number(value)
    }
}

/// Formats a timestamp as ISO-8601 without any zone designator.
///
/// The fractional part is omitted when the microsecond component is zero and
/// is exactly six digits otherwise.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Encodes typed fields into a `{"fields": {...}}` wrapper.
#[must_use]
pub fn encode(fields: &Fields) -> Value {
    let document = WireDocument {
        fields: fields
            .iter()
            .map(|(name, value)| (name.clone(), WireValue::from(value)))
            .collect(),
    };
    // Every WireValue serializes to plain JSON; this cannot fail.
    serde_json::to_value(document).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Decodes a `{"fields": {...}}` wrapper into typed fields.
///
/// A missing or null `fields` member yields an empty map. A field carrying
/// none of the known tags decodes to `None`.
///
/// # Errors
///
/// Returns an error if the document is not an object, or if a known tag
/// carries a payload that cannot be converted.
pub fn decode(document: &Value) -> CodecResult<DecodedFields> {
    let wrapper = document.as_object().ok_or_else(|| {
        CodecError::MalformedDocument("document is not a JSON object".to_string())
    })?;

    let fields = match wrapper.get("fields") {
        None | Some(Value::Null) => return Ok(DecodedFields::new()),
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(CodecError::MalformedDocument(
                "'fields' is not a JSON object".to_string(),
            ));
        }
    };

    fields
        .iter()
        .map(|(name, tagged)| Ok((name.clone(), decode_value(name, tagged)?)))
        .collect()
}

fn decode_value(field: &str, tagged: &Value) -> CodecResult<Option<FieldValue>> {
    let Some(tagged) = tagged.as_object() else {
        return Ok(None);
    };

    if let Some(v) = tagged.get(STRING_TAG) {
        let s = v.as_str().ok_or_else(|| invalid(field, STRING_TAG))?;
        return Ok(Some(FieldValue::Text(s.to_string())));
    }

    if let Some(v) = tagged.get(BOOLEAN_TAG) {
        let b = v.as_bool().ok_or_else(|| invalid(field, BOOLEAN_TAG))?;
        return Ok(Some(FieldValue::Boolean(b)));
    }

    if let Some(v) = tagged.get(INTEGER_TAG) {
        let parsed = match v {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        return parsed
            .map(|i| Some(FieldValue::Integer(i)))
            .ok_or_else(|| CodecError::InvalidInteger {
                field: field.to_string(),
                value: v.to_string(),
            });
    }

    if let Some(v) = tagged.get(DOUBLE_TAG) {
        let parsed = match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        return parsed
            .map(|f| Some(FieldValue::Float(f)))
            .ok_or_else(|| CodecError::InvalidDouble {
                field: field.to_string(),
                value: v.to_string(),
            });
    }

    if let Some(v) = tagged.get(TIMESTAMP_TAG) {
        let s = v.as_str().ok_or_else(|| invalid(field, TIMESTAMP_TAG))?;
        return Ok(Some(FieldValue::Text(s.to_string())));
    }

    Ok(None)
}

fn invalid(field: &str, tag: &'static str) -> CodecError {
    CodecError::InvalidValue {
        field: field.to_string(),
        tag,
    }
}
