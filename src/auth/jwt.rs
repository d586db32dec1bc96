use chrono::{Utc, Duration};
use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Serialize, Deserialize};
use crate::error::AppError;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
    pub username: String,
}

/// Tokens are issued by the account service; this exists for tooling and tests.
pub fn sign_token(user_id: i64, role: &str, username: &str, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + ttl;
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
        username: username.to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256)
    )
    .map(|d| d.claims)
    .map_err(|e| AppError::unauthorized(format!("Invalid or expired token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_verifies_with_same_secret() {
        let token = sign_token(7, "customer", "dana", "s3cret", Duration::minutes(5)).unwrap();
        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "dana");
        assert_eq!(claims.role, "customer");
    }

    #[test]
    fn wrong_secret_or_expired_token_is_unauthorized() {
        let token = sign_token(7, "customer", "dana", "s3cret", Duration::minutes(5)).unwrap();
        assert!(matches!(verify_token(&token, "other"), Err(AppError::Unauthorized(_))));

        let expired = sign_token(7, "customer", "dana", "s3cret", Duration::hours(-2)).unwrap();
        assert!(matches!(verify_token(&expired, "s3cret"), Err(AppError::Unauthorized(_))));
    }
}
