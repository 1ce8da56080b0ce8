//! Error types for the Spreedly client
//!
//! Every fallible operation in the crate returns [`Result`]. Failures fall
//! into transport errors, rejected requests (non-2xx, carrying the status),
//! decode errors, and caller mistakes caught before any request is sent.

use thiserror::Error;

/// Everything that can go wrong talking to Spreedly or decoding its replies
#[derive(Error, Debug)]
pub enum Error {
    // config
    #[error("Bad configuration: {message}")]
    Config { message: String },

    #[error("Config field `{field}` is required")]
    MissingConfigField { field: String },

    #[error("Config field `{field}` is invalid: {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Malformed YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON conversion failed: {0}")]
    JsonParse(#[from] serde_json::Error),

    // transport and response status
    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spreedly answered {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("No response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Bad URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported HTTP method '{method}' (expected GET, POST, PUT or DELETE)")]
    InvalidMethod { method: String },

    // response decoding
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("Cannot convert '{text}' in <{field}> to {type_tag}: {message}")]
    Conversion {
        field: String,
        type_tag: String,
        text: String,
        message: String,
    },

    #[error("Unexpected response shape: {message}")]
    Decode { message: String },

    // request building
    #[error("Failed to write XML: {message}")]
    XmlWrite { message: String },

    #[error("Bad path template: {message}")]
    Template { message: String },

    #[error("Unknown subscriber field: {field}")]
    UnknownField { field: String },

    // everything else
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// `field` was present but unusable
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Non-2xx answer, keeping the body for diagnostics
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// A typed leaf whose text does not parse as its `type` attribute
    pub fn conversion(
        field: impl Into<String>,
        type_tag: impl Into<String>,
        text: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Conversion {
            field: field.into(),
            type_tag: type_tag.into(),
            text: text.into(),
            message: message.to_string(),
        }
    }

    pub fn xml_write(message: impl std::fmt::Display) -> Self {
        Self::XmlWrite {
            message: message.to_string(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Status code of a rejected request, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the remote service answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Connection failures and timeouts; nothing else is worth resending
    ///
    /// Statuses returned by the service are never transient here: a
    /// rejected request stays rejected.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            Error::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Crate-wide result
pub type Result<T> = std::result::Result<T, Error>;

/// Prefix an error with what was being attempted
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Like [`ResultExt::context`], building the message only on failure
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        let message = message.into();
        self.with_context(|| message)
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}
