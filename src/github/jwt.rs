use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::RelayError;
use crate::github::models::Claims;

/// GitHub rejects app assertions that live longer than ten minutes.
pub const ASSERTION_TTL_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct SignedAssertion {
    pub issuer_id: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub token: String,
}

pub fn load_encoding_key(path: &str) -> Result<EncodingKey, RelayError> {
    let pem = std::fs::read(path).map_err(|e| RelayError::KeyLoad {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    EncodingKey::from_rsa_pem(&pem).map_err(|e| RelayError::KeyLoad {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

pub fn issue_assertion(app_id: &str, key: &EncodingKey) -> Result<SignedAssertion, RelayError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    issue_assertion_at(app_id, key, now)
}

pub fn issue_assertion_at(
    app_id: &str,
    key: &EncodingKey,
    now: u64,
) -> Result<SignedAssertion, RelayError> {
    let claims = Claims {
        iat: now,
        exp: now + ASSERTION_TTL_SECS,
        iss: app_id.to_string(),
    };
    let token = encode(&Header::new(Algorithm::RS256), &claims, key)?;

    Ok(SignedAssertion {
        issuer_id: claims.iss,
        issued_at: claims.iat,
        expires_at: claims.exp,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

    const PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/app-key.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/app-key.pub.pem");

    #[test]
    fn expiry_is_exactly_ten_minutes_after_issue() {
        let key = EncodingKey::from_rsa_pem(PRIVATE_PEM).unwrap();
        let assertion = issue_assertion_at("1052939", &key, 1_700_000_000).unwrap();

        assert_eq!(assertion.issued_at, 1_700_000_000);
        assert_eq!(assertion.expires_at, 1_700_000_600);
        assert_eq!(assertion.issuer_id, "1052939");
    }

    #[test]
    fn token_is_rs256_and_carries_the_claims() {
        let key = EncodingKey::from_rsa_pem(PRIVATE_PEM).unwrap();
        let assertion = issue_assertion_at("42", &key, 1_700_000_000).unwrap();

        let header = decode_header(&assertion.token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        let decoded = decode::<Claims>(
            &assertion.token,
            &DecodingKey::from_rsa_pem(PUBLIC_PEM).unwrap(),
            &validation,
        )
        .unwrap();
        assert_eq!(
            decoded.claims,
            Claims {
                iat: 1_700_000_000,
                exp: 1_700_000_600,
                iss: "42".to_string(),
            }
        );
    }

    #[test]
    fn missing_key_file_is_a_key_load_error() {
        let err = load_encoding_key("/nonexistent/private-key.pem").err().unwrap();
        assert!(matches!(err, RelayError::KeyLoad { .. }));
    }
}
