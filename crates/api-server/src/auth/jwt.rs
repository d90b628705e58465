use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Sign an HS256 token for `username` valid for `ttl`.
///
/// The secret comes from the caller (configuration), not from a
/// process-wide global.
pub fn issue_token(secret: &str, username: &str, ttl: Duration) -> Result<String, String> {
    let exp = (Utc::now() + ttl).timestamp() as usize;
    let claims = Claims {
        sub: username.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| format!("Failed to sign JWT: {}", err))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, String> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|decoded| decoded.claims)
    .map_err(|err| format!("Invalid JWT: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let token = issue_token("secret", "testuser", Duration::minutes(10)).unwrap();
        let claims = verify_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "testuser");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token("secret", "testuser", Duration::minutes(10)).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default validation leeway.
        let token = issue_token("secret", "testuser", Duration::minutes(-5)).unwrap();
        assert!(verify_token("secret", &token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token("secret", "not.a.jwt").is_err());
    }
}
