mod auth_payload;
mod bookmark;
mod user;

pub use auth_payload::AuthPayload;
pub use bookmark::{Bookmark, BookmarkChanges, NewBookmark};
pub use user::{User, UserChanges};
