//! CLI module
//!
//! Command-line interface to a Spreedly site.
//!
//! # Commands
//!
//! - `plans` - List subscription plans
//! - `get` / `create` / `get-or-create` / `update` - Subscriber records
//! - `trial` / `comp-subscription` / `comp-extension` - Subscriptions
//! - `delete` / `cleanup` - Remove subscribers (test sites only)
//! - `signup-url` - Hosted signup page
//! - `query` - Raw request
//! - `decode` - Decode an XML document offline

mod commands;
mod runner;

pub use commands::{parse_assignment, Cli, Commands};
pub use runner::Runner;
