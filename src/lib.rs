//! # Spreedly Client
//!
//! An async client for the Spreedly subscription-billing API, built on a
//! schema-less decoder for Spreedly's typed XML.
//!
//! ## Features
//!
//! - **Typed XML decoding**: `type` and `nil` attributes become integers,
//!   decimals, booleans, datetimes, arrays and nulls
//! - **Subscriber management**: create, fetch, update, get-or-create
//! - **Subscriptions**: free trials, complimentary subscriptions and time
//!   extensions
//! - **Guarded cleanup**: destructive calls only run against test sites
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spreedly_client::{Client, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(ClientConfig::new("59f064f450af88df", "mysite-test"))?;
//!
//!     for plan in client.get_plans().await? {
//!         println!("{} costs {:?}", plan["name"].as_str().unwrap_or("?"), plan["price"]);
//!     }
//!
//!     let subscriber = client.get_subscriber(42).await?;
//!     println!("active: {:?}", subscriber["active"].as_bool());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         api::Client                         │
//! │  plans · subscribers · trials · complimentary · cleanup     │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────────────┴──┬───────────────┬───────────┐
//! │   Auth   │        HTTP         │    Decode     │  Config   │
//! ├──────────┼─────────────────────┼───────────────┼───────────┤
//! │ Basic    │ GET/POST/PUT/DELETE │ type hints    │ YAML/JSON │
//! │ token:X  │ Timeout             │ nil → null    │ env vars  │
//! │          │ Transport retries   │ root unwrap   │ CLI flags │
//! └──────────┴─────────────────────┴───────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]

/// Error types for the client
pub mod error;

/// HTTP verbs and retry backoff
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with transport retries
pub mod http;

/// Typed XML decoder
pub mod decode;

/// Client configuration
pub mod config;

/// Endpoint path templates
pub mod template;

/// Spreedly API operations
pub mod api;

/// Command-line interface
pub mod cli;

pub use error::{Error, Result};
pub use types::*;

pub use api::{Client, DurationUnits, Lookup, Provisioned, Subscriber, SubscriberUpdate, SubscriptionPlan};
pub use config::ClientConfig;
pub use decode::{objectify, RepeatedElements, Value, XmlObjectifier};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");
