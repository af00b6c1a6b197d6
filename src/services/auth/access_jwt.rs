use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::AccessKey;
use crate::services::auth::verifier::{TokenError, TokenVerifier};

fn aud_is_present_and_valid(aud: &serde_json::Value) -> bool {
    match aud {
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(arr) => arr.iter().any(|v| match v {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        // Missing claim ends up as Null due to #[serde(default)]
        _ => false,
    }
}

/// Access token (JWT) claims.
///
/// `sub` carries the member login id.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    // Keep as Value to accept both string and array. Validation handles audience checks.
    #[serde(default)]
    pub aud: serde_json::Value,

    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub iat: Option<u64>,
}

/// Access-token verifier backed by `jsonwebtoken`.
///
/// - EdDSA (Ed25519 public key PEM) or HS256 (shared secret), chosen by `AccessKey`
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtTokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtTokenVerifier {
    pub fn new(
        key: &AccessKey,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, TokenError> {
        let (decoding_key, algorithm) = match key {
            AccessKey::Ed25519PublicPem(pem) => {
                let decoding_key = DecodingKey::from_ed_pem(pem.as_bytes())
                    .map_err(|e| TokenError::Key(format!("invalid ed25519 public key pem: {e}")))?;
                (decoding_key, Algorithm::EdDSA)
            }
            AccessKey::HmacSecret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature, `exp`, `iss`, `aud`, then require the claims we rely on to be non-empty.
    pub fn verify_strict(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let claims =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?
                .claims;

        if claims.iss.trim().is_empty() {
            return Err(TokenError::EmptyClaim("iss"));
        }
        if claims.exp == 0 {
            return Err(TokenError::EmptyClaim("exp"));
        }
        if !aud_is_present_and_valid(&claims.aud) {
            return Err(TokenError::MissingOrInvalidAud);
        }

        Ok(claims)
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn extract_identity(&self, token: &str) -> Result<Option<String>, TokenError> {
        let claims = self.verify_strict(token)?;
        let sub = claims.sub.trim();

        Ok((!sub.is_empty()).then(|| sub.to_string()))
    }

    fn validate(&self, token: &str, identity: &str) -> bool {
        match self.verify_strict(token) {
            Ok(claims) => claims.sub.trim() == identity,
            Err(err) => {
                tracing::debug!(error = %err, "access token rejected during validation");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-with-enough-entropy-0123456789";

    fn verifier() -> JwtTokenVerifier {
        JwtTokenVerifier::new(
            &AccessKey::HmacSecret(SECRET.to_string()),
            "https://auth.example.test",
            "bearer-gate",
            0,
        )
        .unwrap()
    }

    fn sign(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    #[test]
    fn extracts_subject_of_a_valid_token() {
        let token = sign(json!({
            "iss": "https://auth.example.test",
            "aud": "bearer-gate",
            "sub": "alice",
            "exp": now() + 600,
        }));

        let v = verifier();
        assert_eq!(v.extract_identity(&token).unwrap(), Some("alice".to_string()));
        assert!(v.validate(&token, "alice"));
        assert!(!v.validate(&token, "bob"));
    }

    #[test]
    fn blank_subject_yields_no_identity() {
        let token = sign(json!({
            "iss": "https://auth.example.test",
            "aud": "bearer-gate",
            "sub": "  ",
            "exp": now() + 600,
        }));

        assert_eq!(verifier().extract_identity(&token).unwrap(), None);
    }

    #[test]
    fn expired_token_is_an_error() {
        let token = sign(json!({
            "iss": "https://auth.example.test",
            "aud": "bearer-gate",
            "sub": "alice",
            "exp": now() - 3600,
        }));

        let v = verifier();
        assert!(matches!(v.extract_identity(&token), Err(TokenError::Jwt(_))));
        assert!(!v.validate(&token, "alice"));
    }

    #[test]
    fn wrong_audience_is_an_error() {
        let token = sign(json!({
            "iss": "https://auth.example.test",
            "aud": "someone-else",
            "sub": "alice",
            "exp": now() + 600,
        }));

        assert!(verifier().extract_identity(&token).is_err());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(verifier().extract_identity("abc.def.ghi").is_err());
        assert!(!verifier().validate("abc.def.ghi", "alice"));
    }

    #[test]
    fn rejects_malformed_public_key() {
        let err = JwtTokenVerifier::new(
            &AccessKey::Ed25519PublicPem("not a pem".to_string()),
            "iss",
            "aud",
            0,
        )
        .unwrap_err();
        assert!(matches!(err, TokenError::Key(_)));
    }
}
