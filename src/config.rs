/*
 * Responsibility
 * - 環境変数から設定を読み込む (PORT, DATABASE_URL, トークン検証, gate のメッセージ)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material used to verify access tokens.
#[derive(Clone, PartialEq, Eq)]
pub enum AccessKey {
    /// EdDSA: Ed25519 public key in PEM form
    Ed25519PublicPem(String),
    /// HS256 shared secret
    HmacSecret(String),
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            AccessKey::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
            AccessKey::HmacSecret(_) => f.write_str("HmacSecret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_leeway_seconds: u64,
    pub access_key: AccessKey,

    // 403 body message for members whose status is denied
    pub account_inactive_message: String,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = required("DATABASE_URL")?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let auth_issuer = required("AUTH_ISSUER")?;
        let auth_audience = required("AUTH_AUDIENCE")?;
        let access_token_leeway_seconds = parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        // PEM wins when both are set; one of them is required.
        let access_key = match (
            lookup("ACCESS_JWT_PUBLIC_KEY_PEM"),
            lookup("ACCESS_JWT_SECRET"),
        ) {
            (Some(pem), _) => AccessKey::Ed25519PublicPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) if secret.trim().is_empty() => {
                return Err(ConfigError::Invalid("ACCESS_JWT_SECRET"));
            }
            (None, Some(secret)) => AccessKey::HmacSecret(secret),
            (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
        };

        let account_inactive_message = lookup("ACCOUNT_INACTIVE_MESSAGE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "account inactive".to_string());

        let request_timeout_seconds = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        let request_body_limit_bytes = parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_key,
            account_inactive_message,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

// Absent => default; present but unparsable => Invalid (a typo should not silently fall back).
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
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
        move |key: &str| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/members"),
        ("AUTH_ISSUER", "https://auth.example.test"),
        ("AUTH_AUDIENCE", "bearer-gate"),
        ("ACCESS_JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup_from(BASE)).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.access_token_leeway_seconds, 60);
        assert_eq!(config.access_key, AccessKey::HmacSecret("secret".to_string()));
        assert_eq!(config.account_inactive_message, "account inactive");
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn public_key_pem_takes_precedence() {
        let mut pairs = BASE.to_vec();
        pairs.push(("ACCESS_JWT_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc"));
        pairs.push(("APP_ENV", "PROD"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(
            config.access_key,
            AccessKey::Ed25519PublicPem("-----BEGIN PUBLIC KEY-----\nabc".to_string())
        );
        assert!(config.app_env.is_production());
    }

    #[test]
    fn missing_required_values_are_reported() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "AUTH_AUDIENCE")
            .collect();
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Missing("AUTH_AUDIENCE")
        );

        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "ACCESS_JWT_SECRET")
            .collect();
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")
        );
    }

    #[test]
    fn unparsable_numbers_are_invalid() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "http"));
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
    }

    #[test]
    fn custom_denied_message() {
        let mut pairs = BASE.to_vec();
        pairs.push(("ACCOUNT_INACTIVE_MESSAGE", "계정이 비활성 상태입니다."));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.account_inactive_message, "계정이 비활성 상태입니다.");
    }
}
