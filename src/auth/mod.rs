pub mod gate;
pub mod session;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::PlatformConfig;
use crate::error::{AppError, Result};
use crate::models::{Claims, VideoGrant};

/// Lifetime of participant grants; matches the platform's default.
pub const PARTICIPANT_TOKEN_TTL_SECONDS: i64 = 6 * 60 * 60;

/// Lifetime of grants this server uses against the management API.
pub const SERVICE_TOKEN_TTL_SECONDS: i64 = 10 * 60;

/// Signs access grants with the platform API key/secret pair.
#[derive(Clone)]
pub struct TokenIssuer {
    api_key: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(platform: &PlatformConfig) -> Self {
        Self {
            api_key: platform.api_key.clone(),
            encoding_key: EncodingKey::from_secret(platform.api_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(platform.api_secret.as_bytes()),
        }
    }

    /// Mint a participant token: join, publish and subscribe on `room`.
    ///
    /// Every call carries a fresh `jti`, so identical inputs yield distinct
    /// tokens that stay valid independently until expiry.
    pub fn participant_token(&self, identity: &str, room: &str) -> Result<String> {
        self.sign(
            Some(identity.to_string()),
            VideoGrant::participant(room),
            PARTICIPANT_TOKEN_TTL_SECONDS,
        )
    }

    /// Short-lived token for management API calls.
    pub fn service_token(&self, grant: VideoGrant) -> Result<String> {
        self.sign(None, grant, SERVICE_TOKEN_TTL_SECONDS)
    }

    fn sign(&self, identity: Option<String>, video: VideoGrant, ttl_seconds: i64) -> Result<String> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            iss: self.api_key.clone(),
            sub: identity,
            jti: Some(Uuid::new_v4().to_string()),
            nbf: now,
            exp: now + ttl_seconds,
            video,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token issued with this key pair and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.api_key.as_str()]);
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}
