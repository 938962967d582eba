/// RS256 access-token validation
///
/// Tokens are issued by the identity provider; this service only holds the
/// public key. HS* algorithms are never accepted.
use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AuthUser;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;
const ACCESS_TOKEN_TYPE: &str = "access";

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// "access" or "refresh"
    pub token_type: String,
    pub username: String,
}

pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn from_rsa_pem(public_key_pem: &str) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| anyhow!("Invalid JWT public key: {e}"))?;

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Validate a bearer token and resolve the principal it names.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| anyhow!("Token validation failed: {e}"))?;
        let claims = data.claims;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow!("Expected access token, got {}", claims.token_type));
        }
        if claims.username.trim().is_empty() {
            return Err(anyhow!("Token has no username"));
        }

        let id = Uuid::parse_str(&claims.sub).map_err(|_| anyhow!("Invalid user ID"))?;
        Ok(AuthUser::new(id, claims.username))
    }
}
