use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Process configuration, read once from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: Option<String>,
    pub access_token_secret: String,
    pub payment_secret_key: String,
    pub payment_currency: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{} must be set", key))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("PORT '{}' is not a valid port: {}", raw, e))?,
            None => 5000,
        };

        let allowed_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            database_name: lookup("DATABASE_NAME").filter(|v| !v.trim().is_empty()),
            access_token_secret: required("ACCESS_TOKEN_SECRET")?,
            payment_secret_key: required("PAYMENT_SECRET_KEY")?,
            payment_currency: lookup("PAYMENT_CURRENCY")
                .unwrap_or_else(|| "usd".to_string())
                .to_lowercase(),
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("PAYMENT_SECRET_KEY", "sk_test_123"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.payment_currency, "usd");
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(config.database_name.is_none());
    }

    #[test]
    fn requires_token_secret() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("PAYMENT_SECRET_KEY", "sk_test_123"),
        ]))
        .unwrap_err();

        assert!(err.contains("ACCESS_TOKEN_SECRET"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("PORT", "http"),
            ("DATABASE_URL", "memory://"),
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("PAYMENT_SECRET_KEY", "sk_test_123"),
        ]))
        .unwrap_err();

        assert!(err.contains("PORT"));
    }
}
