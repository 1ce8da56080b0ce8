//! Endpoint paths, relative to the site's API base URL

use crate::error::Result;
use crate::template::{render, TemplateContext};

pub const SUBSCRIPTION_PLANS: &str = "subscription_plans.xml";
pub const SUBSCRIBERS: &str = "subscribers.xml";
pub const SUBSCRIBER: &str = "subscribers/{{ id }}.xml";
pub const FREE_TRIAL: &str = "subscribers/{{ id }}/subscribe_to_free_trial.xml";
pub const COMPLIMENTARY_SUBSCRIPTIONS: &str = "subscribers/{{ id }}/complimentary_subscriptions.xml";
pub const COMPLIMENTARY_TIME_EXTENSIONS: &str =
    "subscribers/{{ id }}/complimentary_time_extensions.xml";

/// Render a per-subscriber endpoint
pub fn for_subscriber(template: &str, id: u64) -> Result<String> {
    render(template, &TemplateContext::new().with("id", id))
}
