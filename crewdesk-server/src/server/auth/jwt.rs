use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{Role, User};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token expiration in minutes
    pub expiration_minutes: i64,
    /// Issuer claim
    pub issuer: String,
    /// Audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| {
                #[cfg(debug_assertions)]
                {
                    "crewdesk-dev-secret-do-not-use-in-production".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("JWT_SECRET environment variable must be set in release builds")
                }
            }),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12 * 60),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "crewdesk-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "crewdesk-client".to_string()),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Username for display and logs
    pub username: String,
    /// Role name; capabilities are derived server-side, never trusted
    /// from the token beyond this single claim.
    pub role: String,
    /// Token type (only "access" is issued)
    pub token_type: String,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token expired")]
    ExpiredToken,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT issue/verify service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let expires = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            token_type: "access".to_string(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Pull the bearer token out of an Authorization header value.
    pub fn extract_from_header(header: Option<&str>) -> Result<&str, JwtError> {
        let header =
            header.ok_or_else(|| JwtError::InvalidToken("Missing Authorization header".into()))?;
        header
            .strip_prefix("Bearer ")
            .ok_or_else(|| JwtError::InvalidToken("Expected Bearer token".into()))
    }
}

/// Authenticated caller, as resolved from validated claims.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken("Subject is not a user id".into()))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(JwtError::InvalidToken)?;
        Ok(Self {
            id,
            username: claims.username,
            role,
        })
    }
}
