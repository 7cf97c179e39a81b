//! Bearer session tokens.
//!
//! A token is an HS256 JWT whose `sub` is the account id and whose `exp` lies
//! 24 hours after issuance.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::ServerError;

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn issue(&self, account_id: i64) -> Result<IssuedToken, ServerError> {
        self.issue_at(account_id, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        account_id: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, ServerError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal(format!("failed to sign token: {err}")))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);
        Ok(IssuedToken { token, expires_at })
    }

    /// Returns the account id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<i64, ServerError> {
        self.verify_at(token, Utc::now())
    }

    pub(crate) fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, ServerError> {
        // Expiry is checked against `now` below instead of the library clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| ServerError::Unauthorized(format!("invalid token: {err}")))?;
        if data.claims.exp <= now.timestamp() {
            return Err(ServerError::Unauthorized("token expired".to_string()));
        }
        data.claims
            .sub
            .parse()
            .map_err(|_| ServerError::Unauthorized("invalid token subject".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn token_is_valid_for_a_day() {
        let issuer = TokenIssuer::new("secret");
        let issued = issuer.issue_at(42, t0()).unwrap();
        assert_eq!(issued.expires_at, t0() + Duration::hours(24));

        let almost = t0() + Duration::hours(23) + Duration::minutes(59);
        assert_eq!(issuer.verify_at(&issued.token, almost).unwrap(), 42);

        let late = t0() + Duration::hours(24) + Duration::minutes(1);
        assert!(matches!(
            issuer.verify_at(&issued.token, late),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issued = TokenIssuer::new("secret").issue_at(1, t0()).unwrap();
        let other = TokenIssuer::new("different");
        assert!(matches!(
            other.verify_at(&issued.token, t0()),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = TokenIssuer::new("secret");
        let issued = issuer.issue_at(7, t0()).unwrap();
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        parts[1] = "eyJzdWIiOiI4IiwiaWF0IjowLCJleHAiOjQxMDI0NDQ4MDB9";
        let forged = parts.join(".");
        assert!(issuer.verify_at(&forged, t0()).is_err());
        assert!(issuer.verify_at("not-a-token", t0()).is_err());
    }
}
