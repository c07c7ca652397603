use axum::response::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AuthPayload, Bookmark, BookmarkChanges, NewBookmark, User, UserChanges};
use crate::routes::{AccessTokenResponse, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health_check::health_check,
        crate::routes::auth::signup,
        crate::routes::auth::signin,
        crate::routes::users::get_me,
        crate::routes::users::edit_user,
        crate::routes::bookmarks::get_bookmarks,
        crate::routes::bookmarks::get_bookmark_by_id,
        crate::routes::bookmarks::create_bookmark,
        crate::routes::bookmarks::edit_bookmark,
        crate::routes::bookmarks::delete_bookmark,
    ),
    components(schemas(
        AccessTokenResponse,
        AuthPayload,
        Bookmark,
        BookmarkChanges,
        ErrorResponse,
        NewBookmark,
        User,
        UserChanges,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Sign-up and sign-in"),
        (name = "users", description = "The authenticated user"),
        (name = "bookmarks", description = "Bookmarks of the authenticated user"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
