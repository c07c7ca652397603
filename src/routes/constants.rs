//! Common constants used across route handlers

/// Generic error message for internal server errors
pub const ERROR_SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Error message for missing or invalid bearer credentials
pub const ERROR_AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Sign-up with an email that is already registered
pub const ERROR_CREDENTIALS_TAKEN: &str = "Credentials taken";

/// Sign-in with an unknown email or a wrong password
pub const ERROR_CREDENTIALS_INCORRECT: &str = "Credentials incorrect";

/// Touching a resource owned by another user
pub const ERROR_ACCESS_DENIED: &str = "Access to resource denied";

pub const ERROR_BOOKMARK_NOT_FOUND: &str = "Bookmark not found";

pub const ERROR_USER_NOT_FOUND: &str = "User not found";

/// Request without a body where one is expected
pub const ERROR_BODY_REQUIRED: &str = "Request body is required";
