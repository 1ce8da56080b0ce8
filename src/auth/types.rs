//! Auth configuration types

use std::fmt;

/// Password paired with the API token in Basic credentials
pub const TOKEN_PASSWORD: &str = "X";

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// Basic credentials for an API token
    pub fn api_token(token: impl Into<String>) -> Self {
        AuthConfig::Basic {
            username: token.into(),
            password: TOKEN_PASSWORD.to_string(),
        }
    }
}

// Credentials never reach logs
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Basic { .. } => f
                .debug_struct("Basic")
                .field("username", &"***")
                .field("password", &"***")
                .finish(),
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(matches!(config, AuthConfig::None));
    }

    #[test]
    fn test_api_token_uses_x_password() {
        let config = AuthConfig::api_token("abc123");
        assert_eq!(
            config,
            AuthConfig::Basic {
                username: "abc123".to_string(),
                password: "X".to_string(),
            }
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let rendered = format!("{:?}", AuthConfig::api_token("secret-token"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("Basic"));
    }
}
