pub mod auth;
pub mod bookmarks;
pub mod constants;
mod error;
pub mod health_check;
pub mod users;
mod validated_json;

pub use auth::*;
pub use bookmarks::{
    create_bookmark, delete_bookmark, edit_bookmark, get_bookmark_by_id, get_bookmarks,
};
pub use error::{ApiError, ErrorResponse};
pub use health_check::*;
pub use users::{edit_user, get_me};
pub use validated_json::{ValidatedJson, parse_and_validate};
