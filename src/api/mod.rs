//! Spreedly API module
//!
//! A [`Client`] is bound to one site. Its operations map one-to-one onto
//! the Spreedly v4 endpoints and return decoded [`crate::decode::Value`]
//! trees; [`Subscriber`] and [`SubscriptionPlan`] give typed views of them.
//!
//! # Example
//!
//! ```no_run
//! use spreedly_client::{Client, ClientConfig};
//!
//! # async fn run() -> spreedly_client::Result<()> {
//! let client = Client::new(ClientConfig::new("token", "mysite-test"))?;
//! let subscriber = client.get_or_create_subscriber(42, "jack").await?;
//! println!("{}", subscriber.value()["screen_name"].as_str().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod endpoints;
mod requests;
mod types;

pub use client::Client;
pub use requests::{
    complimentary_subscription, complimentary_time_extension, new_subscriber, subscription_plan,
    SubscriberUpdate, SUBSCRIBER_UPDATE_FIELDS,
};
pub use types::{DurationUnits, Lookup, Provisioned, Subscriber, SubscriptionPlan};
