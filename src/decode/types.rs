//! Decoder types
//!
//! Defines the decoded value tree, the type tags understood by the
//! objectifier, and its configuration.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::ops::Index;

/// Field name → value mapping produced for elements with children
pub type Object = BTreeMap<String, Value>;

/// A decoded XML value
///
/// This is the only output type of the objectifier. Values compare
/// structurally and carry no identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Explicit `nil="true"` leaf or an empty datetime
    #[default]
    Null,
    /// `type="boolean"`
    Bool(bool),
    /// `type="integer"`
    Integer(i64),
    /// `type="decimal"`, kept exact
    Decimal(Decimal),
    /// `type="datetime"`, always UTC
    DateTime(DateTime<Utc>),
    /// Untyped, `type="string"` or unrecognized type leaves
    String(String),
    /// `type="array"` elements
    Array(Vec<Value>),
    /// Elements with children
    Object(Object),
}

static NULL: Value = Value::Null;

impl Value {
    /// Returns true if the value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a field of an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::DateTime(_) => "datetime",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Convert to a JSON value
    ///
    /// Decimals become strings so no precision is lost; datetimes become
    /// RFC 3339 strings with a `Z` suffix.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(n) => JsonValue::from(*n),
            Value::Decimal(d) => JsonValue::String(d.to_string()),
            Value::DateTime(dt) => JsonValue::String(format_datetime(dt)),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Decimal(d) => serializer.collect_str(d),
            Value::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(fields) => serializer.collect_map(fields),
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing keys and non-object values index to `Null`
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(fields: Object) -> Self {
        Value::Object(fields)
    }
}

// ============================================================================
// Type tags
// ============================================================================

/// Value of an element's `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Array,
}

impl TypeTag {
    /// Look up a tag by its attribute text. Unrecognized tags yield `None`
    /// and the element is read as raw text.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(TypeTag::String),
            "integer" => Some(TypeTag::Integer),
            "decimal" => Some(TypeTag::Decimal),
            "boolean" => Some(TypeTag::Boolean),
            "datetime" => Some(TypeTag::DateTime),
            "array" => Some(TypeTag::Array),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Integer => "integer",
            TypeTag::Decimal => "decimal",
            TypeTag::Boolean => "boolean",
            TypeTag::DateTime => "datetime",
            TypeTag::Array => "array",
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// How untyped elements treat sibling children sharing a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatedElements {
    /// Later siblings replace earlier ones under the same key
    #[default]
    Overwrite,
    /// Repeated siblings are gathered into an array in document order
    Accumulate,
}

/// Field names that are forced to integers after decoding
pub const INTEGER_FIELDS: [&str; 2] = ["customer_id", "pagination_id"];

/// Configuration for the XML objectifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Policy for repeated untyped children
    pub repeated_elements: RepeatedElements,
    /// Top-level fields coerced to integers when present
    pub integer_fields: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            repeated_elements: RepeatedElements::Overwrite,
            integer_fields: INTEGER_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl DecoderConfig {
    /// Create the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repeated element policy
    #[must_use]
    pub fn repeated_elements(mut self, policy: RepeatedElements) -> Self {
        self.repeated_elements = policy;
        self
    }

    /// Replace the set of integer-coerced fields
    #[must_use]
    pub fn integer_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.integer_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
