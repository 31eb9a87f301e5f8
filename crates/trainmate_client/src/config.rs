use crate::{AuthToken, TrainmateError};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Clone, Debug)]
pub struct Config {
    pub token: AuthToken,
    pub base_url: String,
    /// Email of the signed-in user. Shown in place of the profile's own email.
    pub user_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, TrainmateError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, TrainmateError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("TRAINMATE_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TrainmateError::Config("TRAINMATE_TOKEN missing".into()))?;
        let base_url = get("TRAINMATE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let user_email = get("TRAINMATE_USER_EMAIL").filter(|e| !e.trim().is_empty());
        Ok(Self {
            token: AuthToken::new(token),
            base_url,
            user_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_missing_token() {
        let get = |k: &str| match k {
            "TRAINMATE_API_URL" => Some("http://localhost".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn from_env_blank_token_is_missing() {
        let get = |k: &str| match k {
            "TRAINMATE_TOKEN" => Some("  ".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "TRAINMATE_TOKEN" => Some("sekrit".into()),
            "TRAINMATE_API_URL" => Some("http://localhost".into()),
            "TRAINMATE_USER_EMAIL" => Some("ana@example.com".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "http://localhost");
        assert_eq!(cfg.token.expose(), "sekrit");
        assert_eq!(cfg.user_email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn from_env_defaults_base_url() {
        let get = |k: &str| match k {
            "TRAINMATE_TOKEN" => Some("sekrit".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert!(cfg.user_email.is_none());
    }
}
