/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and the password strength rule
/// - [`jwt`]: HS256 access and refresh tokens
/// - [`middleware`]: the per-request [`AuthorizedUser`](middleware::AuthorizedUser)
///   and token-to-user resolution
/// - [`authorization`]: board membership and administration checks
///
/// # Example
///
/// ```no_run
/// use budgetboard_shared::auth::password::{hash_password, verify_password};
/// use budgetboard_shared::auth::jwt::{create_token, Claims, TokenType};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Secr3t!pass")?;
/// assert!(verify_password("Secr3t!pass", &hash)?);
///
/// let token = create_token(&Claims::new(1, TokenType::Access), "a-signing-secret-of-at-least-32-bytes")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
