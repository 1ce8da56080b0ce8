//! Response decoder module
//!
//! Converts typed XML documents into nested [`Value`] trees.
//!
//! # Overview
//!
//! Spreedly responses annotate leaves with a `type` attribute
//! (`string`, `integer`, `decimal`, `boolean`, `datetime`, `array`) and
//! mark explicit nulls with `nil="true"`. The objectifier reads those hints
//! without any schema, renames hyphenated tags to underscored field names
//! and unwraps the document root.

mod decoders;
mod types;

pub use decoders::{
    coerce_integer_fields, field_name, objectify, XmlObjectifier, DATETIME_FORMAT,
};
pub use types::{DecoderConfig, Object, RepeatedElements, TypeTag, Value, INTEGER_FIELDS};
