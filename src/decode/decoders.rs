//! XML objectifier
//!
//! Walks a parsed XML tree depth-first and turns every element into a
//! [`Value`], using the `type` attribute of leaves to pick a conversion.

use super::types::{DecoderConfig, Object, RepeatedElements, TypeTag, Value};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use roxmltree::{Document, Node, ParsingOptions};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

/// Wire format of `type="datetime"` leaves
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Field name for an XML tag: every `-` becomes `_`
pub fn field_name(tag: &str) -> String {
    tag.replace('-', "_")
}

/// Decode a document with the default configuration
///
/// The root element is unwrapped: for `<subscriber>…</subscriber>` the
/// subscriber's fields are returned directly.
pub fn objectify(xml: &str) -> Result<Value> {
    XmlObjectifier::default().decode(xml)
}

/// Schema-less XML to [`Value`] decoder
#[derive(Debug, Clone, Default)]
pub struct XmlObjectifier {
    config: DecoderConfig,
}

impl XmlObjectifier {
    /// Create an objectifier with the given config
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a whole document, unwrap its root and coerce integer fields
    pub fn decode(&self, xml: &str) -> Result<Value> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)?;
        let (root, mut value) = self.decode_element(doc.root_element())?;
        coerce_integer_fields(&mut value, &self.config.integer_fields)?;
        debug!(root = %root, kind = value.type_name(), "Decoded XML document");
        Ok(value)
    }

    /// Decode one element and its subtree into `(field_name, value)`
    pub fn decode_element(&self, node: Node<'_, '_>) -> Result<(String, Value)> {
        let declared = node.attribute("type").unwrap_or("string");
        let type_tag = TypeTag::parse(declared);
        let name = field_name(node.tag_name().name());

        let children: Vec<Node<'_, '_>> = node.children().filter(|n| n.is_element()).collect();

        if !children.is_empty() {
            let value = if type_tag == Some(TypeTag::Array) {
                let items = children
                    .into_iter()
                    .map(|child| self.decode_element(child).map(|(_, value)| value))
                    .collect::<Result<Vec<_>>>()?;
                Value::Array(items)
            } else {
                Value::Object(self.merge_children(children)?)
            };
            return Ok((name, value));
        }

        if node.attribute("nil") == Some("true") {
            return Ok((name, Value::Null));
        }

        let text = leaf_text(node);
        let value = match type_tag {
            Some(tag) => convert(&name, tag, text.as_deref())?,
            None => Value::String(text.unwrap_or_default()),
        };
        Ok((name, value))
    }

    fn merge_children(&self, children: Vec<Node<'_, '_>>) -> Result<Object> {
        let accumulate = self.config.repeated_elements == RepeatedElements::Accumulate;
        let mut fields = Object::new();
        let mut repeated: HashSet<String> = HashSet::new();

        for child in children {
            let (key, value) = self.decode_element(child)?;

            if accumulate {
                if let Some(existing) = fields.get_mut(&key) {
                    if repeated.contains(&key) {
                        if let Value::Array(items) = existing {
                            items.push(value);
                        }
                    } else {
                        let first = std::mem::take(existing);
                        *existing = Value::Array(vec![first, value]);
                        repeated.insert(key);
                    }
                    continue;
                }
            }

            fields.insert(key, value);
        }

        Ok(fields)
    }
}

/// Concatenated text of a leaf, `None` when it has no text at all
fn leaf_text(node: Node<'_, '_>) -> Option<String> {
    let mut parts = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .peekable();
    parts.peek()?;
    Some(parts.collect())
}

/// Convert leaf text according to its type tag
fn convert(field: &str, tag: TypeTag, text: Option<&str>) -> Result<Value> {
    let raw = text.unwrap_or_default();
    match tag {
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| Error::conversion(field, tag.as_str(), raw, e)),
        TypeTag::Decimal => {
            let trimmed = raw.trim();
            trimmed
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Value::Decimal)
                .map_err(|e| Error::conversion(field, tag.as_str(), raw, e))
        }
        TypeTag::Boolean => Ok(Value::Bool(raw == "true")),
        TypeTag::DateTime => {
            if raw.is_empty() {
                return Ok(Value::Null);
            }
            NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
                .map(|dt| Value::DateTime(dt.and_utc()))
                .map_err(|e| Error::conversion(field, tag.as_str(), raw, e))
        }
        // A typed array with no children
        TypeTag::Array => Ok(Value::Array(Vec::new())),
    }
}

/// Force the given top-level fields to integers
///
/// Applies to an object value, or to each object of an array value.
/// Absent and null fields are skipped; integers are left alone; strings
/// must parse as base-10 integers.
pub fn coerce_integer_fields(value: &mut Value, keys: &[String]) -> Result<()> {
    match value {
        Value::Object(fields) => coerce_object(fields, keys),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(fields) = item {
                    coerce_object(fields, keys)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn coerce_object(fields: &mut Object, keys: &[String]) -> Result<()> {
    for key in keys {
        let Some(slot) = fields.get_mut(key) else {
            continue;
        };

        let coerced = match &*slot {
            Value::Null | Value::Integer(_) => None,
            Value::String(text) => Some(
                text.trim()
                    .parse::<i64>()
                    .map_err(|e| Error::conversion(key.as_str(), "integer", text.as_str(), e))?,
            ),
            other => {
                return Err(Error::conversion(
                    key.as_str(),
                    "integer",
                    other.to_json().to_string(),
                    format!("cannot coerce {} to integer", other.type_name()),
                ))
            }
        };

        if let Some(n) = coerced {
            *slot = Value::Integer(n);
        }
    }
    Ok(())
}
