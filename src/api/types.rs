//! API result types

use crate::decode::Value;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of fetching a subscriber that may not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Value),
    NotFound,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

/// Outcome of get-or-create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// The subscriber already existed
    Existing(Value),
    /// The subscriber was created by this call
    Created(Value),
}

impl Provisioned {
    pub fn was_created(&self) -> bool {
        matches!(self, Provisioned::Created(_))
    }

    pub fn value(&self) -> &Value {
        match self {
            Provisioned::Existing(value) | Provisioned::Created(value) => value,
        }
    }

    pub fn into_inner(self) -> Value {
        match self {
            Provisioned::Existing(value) | Provisioned::Created(value) => value,
        }
    }
}

/// Unit of a complimentary duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnits {
    Days,
    #[default]
    Months,
}

impl DurationUnits {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnits::Days => "days",
            DurationUnits::Months => "months",
        }
    }
}

impl FromStr for DurationUnits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(DurationUnits::Days),
            "month" | "months" => Ok(DurationUnits::Months),
            other => Err(Error::Other(format!(
                "Unknown duration units '{other}' (expected days or months)"
            ))),
        }
    }
}

impl fmt::Display for DurationUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags sent as `nil="true"` decode to `Null`; treat them as unset
fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A subscriber record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub customer_id: i64,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub billing_first_name: Option<String>,
    #[serde(default)]
    pub billing_last_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub on_gift: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub on_trial: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub eligible_for_free_trial: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub lifetime_subscription: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub recurring: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub card_expires_before_next_auto_renew: bool,
    #[serde(default)]
    pub subscription_plan_name: Option<String>,
    #[serde(default)]
    pub feature_level: Option<String>,
    #[serde(default)]
    pub store_credit: Option<Decimal>,
    #[serde(default)]
    pub active_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<&Value> for Subscriber {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.to_json())?)
    }
}

/// A subscription plan offered by the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub force_recurring: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub needs_to_be_renewed: bool,
    #[serde(default)]
    pub duration_quantity: Option<i64>,
    #[serde(default)]
    pub duration_units: Option<String>,
    #[serde(default)]
    pub feature_level: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub site_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<&Value> for SubscriptionPlan {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.to_json())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::objectify;
    use test_case::test_case;

    #[test_case("days", DurationUnits::Days)]
    #[test_case("Day", DurationUnits::Days)]
    #[test_case("months", DurationUnits::Months)]
    #[test_case(" MONTH ", DurationUnits::Months)]
    fn test_duration_units_parse(input: &str, expected: DurationUnits) {
        assert_eq!(input.parse::<DurationUnits>().unwrap(), expected);
    }

    #[test]
    fn test_duration_units_rejects_unknown() {
        assert!("weeks".parse::<DurationUnits>().is_err());
        assert_eq!(DurationUnits::Days.to_string(), "days");
    }

    #[test]
    fn test_provisioned_accessors() {
        let created = Provisioned::Created(Value::from("x"));
        assert!(created.was_created());
        assert_eq!(created.value(), &Value::from("x"));
        assert_eq!(created.into_inner(), Value::from("x"));

        let existing = Provisioned::Existing(Value::Null);
        assert!(!existing.was_created());
    }

    #[test]
    fn test_lookup_accessors() {
        assert!(Lookup::Found(Value::Null).is_found());
        assert_eq!(Lookup::NotFound.found(), None);
    }

    #[test]
    fn test_nil_flags_read_as_false() {
        let value = objectify(
            r#"<subscriber>
                <customer-id>1</customer-id>
                <on-gift type="boolean" nil="true"></on-gift>
                <active type="boolean">true</active>
            </subscriber>"#,
        )
        .unwrap();
        assert_eq!(value.get("on_gift"), Some(&Value::Null));

        let subscriber = Subscriber::try_from(&value).unwrap();
        assert!(!subscriber.on_gift);
        assert!(subscriber.active);

        let plan = objectify(
            r#"<subscription-plan>
                <id type="integer">7</id>
                <name>Gold</name>
                <enabled type="boolean" nil="true"/>
                <force-recurring type="boolean" nil="true"/>
            </subscription-plan>"#,
        )
        .unwrap();
        let plan = SubscriptionPlan::try_from(&plan).unwrap();
        assert!(!plan.enabled);
        assert!(!plan.force_recurring);
    }

    #[test]
    fn test_subscriber_from_value() {
        let value = objectify(
            r#"<subscriber>
                <customer-id type="integer">39053</customer-id>
                <screen-name>jb</screen-name>
                <email nil="true"></email>
                <active type="boolean">true</active>
                <on-trial type="boolean">false</on-trial>
                <store-credit type="decimal">2.5</store-credit>
                <active-until type="datetime">2009-11-10T21:11:00Z</active-until>
                <created-at type="datetime"></created-at>
                <token>abc123</token>
            </subscriber>"#,
        )
        .unwrap();

        let subscriber = Subscriber::try_from(&value).unwrap();
        assert_eq!(subscriber.customer_id, 39053);
        assert_eq!(subscriber.screen_name.as_deref(), Some("jb"));
        assert_eq!(subscriber.email, None);
        assert!(subscriber.active);
        assert!(!subscriber.on_trial);
        assert_eq!(subscriber.store_credit, Some(Decimal::new(25, 1)));
        assert_eq!(
            subscriber.active_until.map(|t| t.to_rfc3339()),
            Some("2009-11-10T21:11:00+00:00".to_string())
        );
        assert_eq!(subscriber.created_at, None);
        assert_eq!(subscriber.token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_subscriber_requires_customer_id() {
        let value = objectify("<subscriber><screen-name>jb</screen-name></subscriber>").unwrap();
        assert!(matches!(
            Subscriber::try_from(&value),
            Err(Error::JsonParse(_))
        ));
    }

    #[test]
    fn test_plan_from_value() {
        let value = objectify(
            r#"<subscription-plan>
                <id type="integer">1824</id>
                <name>Basic</name>
                <price type="decimal">24.0</price>
                <enabled type="boolean">true</enabled>
                <duration-quantity type="integer">3</duration-quantity>
                <duration-units>months</duration-units>
                <site-id type="integer">7</site-id>
            </subscription-plan>"#,
        )
        .unwrap();

        let plan = SubscriptionPlan::try_from(&value).unwrap();
        assert_eq!(plan.id, 1824);
        assert_eq!(plan.name, "Basic");
        assert_eq!(plan.price, Some(Decimal::new(240, 1)));
        assert!(plan.enabled);
        assert!(!plan.force_recurring);
        assert_eq!(plan.duration_quantity, Some(3));
        assert_eq!(plan.duration_units.as_deref(), Some("months"));
        assert_eq!(plan.site_id, Some(7));
        assert_eq!(plan.version, None);
    }
}
