/// JWT issuing and validation
///
/// Tokens are HS256-signed and carry the numeric user id as `sub`. Two kinds
/// are issued at login: a short-lived access token sent as
/// `Authorization: Bearer <token>` on every request, and a refresh token that
/// can only be exchanged for a new access token.
///
/// | Token   | Lifetime |
/// |---------|----------|
/// | access  | 24 hours |
/// | refresh | 30 days  |
///
/// # Example
///
/// ```
/// use budgetboard_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-signing-secret-of-at-least-32-bytes";
/// let token = create_token(&Claims::new(42, TokenType::Access), secret)?;
///
/// let claims = validate_access_token(&token, secret)?;
/// assert_eq!(claims.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim on every token
pub const ISSUER: &str = "budgetboard";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token type: expected {expected}")]
    WrongType { expected: &'static str },
}

/// Kind of token, stored in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// Claims for a user with the default lifetime of the token type
    pub fn new(user_id: i64, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, token_type, token_type.default_expiration())
    }

    pub fn with_expiration(user_id: i64, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Seconds left before expiry, `None` once expired
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        (self.exp > now).then(|| Duration::seconds(self.exp - now))
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, issuer, `exp` and `nbf`
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` is in the past
/// - `JwtError::ValidationError` for any other rejection
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        })
}

fn validate_kind(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;
    if claims.token_type != expected {
        return Err(JwtError::WrongType {
            expected: expected.as_str(),
        });
    }
    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_kind(token, secret, TokenType::Access)
}

pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_kind(token, secret, TokenType::Refresh)
}

/// Exchanges a valid refresh token for a fresh access token of the same user
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;
    create_token(&Claims::new(refresh_claims.sub, TokenType::Access), secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, TokenType::Access);

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(7, TokenType::Access, Duration::hours(1));

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let token = create_token(&Claims::new(7, TokenType::Access), SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, 7);
        assert_eq!(validated.token_type, TokenType::Access);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&Claims::new(7, TokenType::Access), SECRET).unwrap();

        assert!(matches!(
            validate_token(&token, "another-secret-key-at-least-32-bytes"),
            Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(7, TokenType::Access, Duration::seconds(-3600));
        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let access = create_token(&Claims::new(7, TokenType::Access), SECRET).unwrap();
        let refresh = create_token(&Claims::new(7, TokenType::Refresh), SECRET).unwrap();

        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
        assert!(matches!(
            validate_access_token(&refresh, SECRET),
            Err(JwtError::WrongType { expected: "access" })
        ));
        assert!(matches!(
            validate_refresh_token(&access, SECRET),
            Err(JwtError::WrongType { expected: "refresh" })
        ));
    }

    #[test]
    fn test_refresh_access_token() {
        let refresh = create_token(&Claims::new(7, TokenType::Refresh), SECRET).unwrap();

        let access = refresh_access_token(&refresh, SECRET).unwrap();
        let claims = validate_access_token(&access, SECRET).unwrap();
        assert_eq!(claims.sub, 7);

        assert!(refresh_access_token(&access, SECRET).is_err());
    }

    #[test]
    fn test_malformed_token() {
        assert!(validate_token("not.a.jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
