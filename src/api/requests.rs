//! XML request bodies
//!
//! Bodies are written with `quick_xml::Writer`, so every interpolated value
//! is escaped.

use super::types::DurationUnits;
use crate::error::{Error, Result};
use quick_xml::events::BytesText;
use quick_xml::Writer;
use std::collections::BTreeMap;

/// Subscriber fields accepted by the update endpoint
pub const SUBSCRIBER_UPDATE_FIELDS: [&str; 5] = [
    "new-customer-id",
    "screen-name",
    "email",
    "billing-first-name",
    "billing-last-name",
];

/// Write `<root><tag>text</tag>…</root>`
fn write_document<'a, I>(root: &str, fields: I) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut buf = Vec::with_capacity(256);
    let mut writer = Writer::new(&mut buf);

    writer
        .create_element(root)
        .write_inner_content(|w| {
            for (tag, text) in fields {
                w.create_element(tag)
                    .write_text_content(BytesText::new(text))?;
            }
            Ok(())
        })
        .map_err(Error::xml_write)?;

    String::from_utf8(buf).map_err(Error::xml_write)
}

/// Body of a create-subscriber request
pub fn new_subscriber(customer_id: u64, screen_name: &str) -> Result<String> {
    let id = customer_id.to_string();
    write_document(
        "subscriber",
        [("customer-id", id.as_str()), ("screen-name", screen_name)],
    )
}

/// Body of a free-trial request
pub fn subscription_plan(plan_id: u64) -> Result<String> {
    let id = plan_id.to_string();
    write_document("subscription_plan", [("id", id.as_str())])
}

/// Body of a complimentary subscription request
pub fn complimentary_subscription(
    quantity: u32,
    units: DurationUnits,
    feature_level: &str,
) -> Result<String> {
    let quantity = quantity.to_string();
    write_document(
        "complimentary_subscription",
        [
            ("duration_quantity", quantity.as_str()),
            ("duration_units", units.as_str()),
            ("feature_level", feature_level),
        ],
    )
}

/// Body of a complimentary time extension request
pub fn complimentary_time_extension(quantity: u32, units: DurationUnits) -> Result<String> {
    let quantity = quantity.to_string();
    write_document(
        "complimentary_time_extension",
        [
            ("duration_quantity", quantity.as_str()),
            ("duration_units", units.as_str()),
        ],
    )
}

/// Changes to a subscriber's details
///
/// Field names may be given hyphenated (`screen-name`) or underscored
/// (`screen_name`); anything outside [`SUBSCRIBER_UPDATE_FIELDS`] is
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberUpdate {
    fields: BTreeMap<&'static str, String>,
}

impl SubscriberUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an update from `(field, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |update, (field, value)| {
                update.set(field.as_ref(), value)
            })
    }

    /// Set a field by name
    pub fn set(mut self, field: &str, value: impl Into<String>) -> Result<Self> {
        let tag = allowed_tag(field).ok_or_else(|| Error::UnknownField {
            field: field.to_string(),
        })?;
        self.fields.insert(tag, value.into());
        Ok(self)
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.fields.insert("email", email.into());
        self
    }

    #[must_use]
    pub fn screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.fields.insert("screen-name", screen_name.into());
        self
    }

    /// Move the subscriber to a new customer id
    #[must_use]
    pub fn new_customer_id(mut self, customer_id: u64) -> Self {
        self.fields
            .insert("new-customer-id", customer_id.to_string());
        self
    }

    #[must_use]
    pub fn billing_first_name(mut self, name: impl Into<String>) -> Self {
        self.fields.insert("billing-first-name", name.into());
        self
    }

    #[must_use]
    pub fn billing_last_name(mut self, name: impl Into<String>) -> Self {
        self.fields.insert("billing-last-name", name.into());
        self
    }

    /// Value of a field, looked up by either spelling
    pub fn get(&self, field: &str) -> Option<&str> {
        allowed_tag(field)
            .and_then(|tag| self.fields.get(tag))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Body of the update request
    pub fn to_xml(&self) -> Result<String> {
        write_document(
            "subscriber",
            self.fields.iter().map(|(tag, value)| (*tag, value.as_str())),
        )
    }
}

fn allowed_tag(field: &str) -> Option<&'static str> {
    let hyphenated = field.trim().replace('_', "-");
    SUBSCRIBER_UPDATE_FIELDS
        .iter()
        .copied()
        .find(|tag| *tag == hyphenated)
}
