//! CLI commands and argument parsing

use crate::api::DurationUnits;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spreedly subscription-billing client
#[derive(Parser, Debug)]
#[command(name = "spreedly")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API token (overrides config file and SPREEDLY_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Site name (overrides config file and SPREEDLY_SITE)
    #[arg(long, global = true)]
    pub site: Option<String>,

    /// API host, e.g. https://spreedly.com
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List subscription plans
    Plans,

    /// Fetch a subscriber
    Get {
        /// Customer id
        id: u64,
    },

    /// Create a subscriber
    Create {
        /// Customer id
        id: u64,

        /// Screen name
        screen_name: String,
    },

    /// Fetch a subscriber, creating it if it does not exist
    GetOrCreate {
        /// Customer id
        id: u64,

        /// Screen name used when creating
        screen_name: String,
    },

    /// Change a subscriber's details
    Update {
        /// Customer id
        id: u64,

        /// Field to set, e.g. --set email=jack@ctu.gov (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        fields: Vec<String>,
    },

    /// Start a free trial
    Trial {
        /// Customer id
        id: u64,

        /// Subscription plan id
        plan_id: u64,
    },

    /// Grant a complimentary subscription
    CompSubscription {
        /// Customer id
        id: u64,

        /// Duration quantity
        quantity: u32,

        /// Duration units (days or months)
        units: DurationUnits,

        /// Feature level
        feature_level: String,
    },

    /// Grant a complimentary time extension
    CompExtension {
        /// Customer id
        id: u64,

        /// Duration quantity
        quantity: u32,

        /// Duration units (days or months)
        units: DurationUnits,
    },

    /// Delete a subscriber (test sites only)
    Delete {
        /// Customer id
        id: u64,
    },

    /// Delete every subscriber (test sites only)
    Cleanup,

    /// Print the hosted signup page URL
    SignupUrl {
        /// Customer id
        id: u64,

        /// Subscription plan id
        plan_id: u64,

        /// Screen name
        screen_name: String,
    },

    /// Send a raw request and print its status and body
    Query {
        /// Path relative to the site's API base URL
        path: String,

        /// HTTP verb (GET, POST, PUT or DELETE)
        #[arg(long, default_value = "GET")]
        verb: String,

        /// File holding the XML request body
        #[arg(long)]
        body: Option<PathBuf>,
    },

    /// Decode an XML document offline
    Decode {
        /// XML file, or - for stdin
        file: PathBuf,

        /// Collect repeated untyped children into arrays
        #[arg(long)]
        accumulate: bool,
    },
}

/// Split a `FIELD=VALUE` argument
pub fn parse_assignment(arg: &str) -> Option<(&str, &str)> {
    arg.split_once('=')
        .filter(|(field, _)| !field.trim().is_empty())
}
