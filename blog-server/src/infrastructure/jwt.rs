use crate::domain::{AuthenticatedUser, DomainError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims issued by the identity provider (HS256).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: usize,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            picture: claims.picture,
        }
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Result<Self, DomainError> {
        tracing::debug!(
            "Initializing JwtService with secret length: {}",
            secret.len()
        );

        if secret.is_empty() {
            return Err(DomainError::InternalError(
                "JWT secret must not be empty".to_string(),
            ));
        }
        if secret.len() < 32 {
            tracing::warn!(
                "JWT secret is too short ({} chars). Minimum recommended is 32 chars.",
                secret.len()
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Signs a token for `user`, valid for `ttl`. Tokens normally come from the
    /// identity provider; this is for tooling and tests sharing the secret.
    pub fn generate_token(
        &self,
        user: &AuthenticatedUser,
        ttl: Duration,
    ) -> Result<String, DomainError> {
        tracing::debug!("Generating token for user_id: {}", user.user_id);

        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::InternalError("Token expiry out of range".to_string()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.user_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            picture: user.picture.clone(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            DomainError::InternalError(format!("Failed to generate token: {}", e))
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => {
                tracing::debug!("Token verified for user_id: {}", token_data.claims.sub);
                Ok(AuthenticatedUser::from(token_data.claims))
            }
            Err(e) => {
                tracing::warn!("Token verification failed: {}", e);
                Err(DomainError::Unauthorized(format!("Invalid token: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    #[test]
    fn issued_tokens_round_trip_the_identity() {
        let service = JwtService::new(SECRET).unwrap();
        let mut user = AuthenticatedUser::new("user_2abc");
        user.name = Some("Minji".to_string());

        let token = service.generate_token(&user, Duration::hours(1)).unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), user);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let issuer = JwtService::new("another-secret-that-is-also-long-enough").unwrap();
        let token = issuer
            .generate_token(&AuthenticatedUser::new("u1"), Duration::hours(1))
            .unwrap();

        let service = JwtService::new(SECRET).unwrap();
        assert!(matches!(
            service.verify_token(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let service = JwtService::new(SECRET).unwrap();
        let token = service
            .generate_token(&AuthenticatedUser::new("u1"), Duration::hours(-2))
            .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(JwtService::new("").is_err());
    }
}
