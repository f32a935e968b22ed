//! Authentication module
//!
//! Argon2 password hashing, HS256 bearer tokens, and the gateway that
//! resolves `Authorization` headers to an identity.

mod credential;
mod gateway;
mod jwt;
mod middleware;
mod password;

pub use credential::Credential;
pub use gateway::{AuthGateway, AuthenticatedIdentity};
pub use jwt::{Claims, TokenService, DEFAULT_TOKEN_TTL};
pub use middleware::{require_auth, CurrentUser};
pub use password::{HashScheme, PasswordService};
