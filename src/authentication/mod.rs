mod middleware;
mod password;
mod token;

pub use middleware::{UserId, require_auth};
pub use password::{
    AuthError, Credentials, MAX_PASSWORD_LENGTH, register_user, validate_credentials,
};
pub use token::{AccessClaims, TokenError, TokenIssuer};
