//! The ordered session that exercises the whole API as one user.

use crate::harness::{Interaction, Pipeline, PipelineError, Scenario};
use serde_json::{Value, json};

pub const EMAIL: &str = "test@test.com";
pub const PASSWORD: &str = "p@ssword";

pub fn credentials() -> Value {
    json!({ "email": EMAIL, "password": PASSWORD })
}

fn user_changes() -> Value {
    json!({ "firstName": "Vladimir", "email": "vlad@codewithvlad.com" })
}

fn new_bookmark() -> Value {
    json!({
        "title": "The Fall",
        "description": "A short novel by Albert Camus",
        "link": "https://en.wikipedia.org/wiki/The_Fall_(Camus_novel)",
        "userId": "$S{userId}",
    })
}

fn bookmark_changes() -> Value {
    json!({
        "title": "The Fall (Penguin Modern Classics)",
        "description": "Clamence confesses in an Amsterdam bar",
        "userId": "$S{userId}",
    })
}

fn rejected_without(endpoint: &str, what: &str, body: Option<&str>) -> Scenario {
    let action = if endpoint.ends_with("signup") { "signup" } else { "signin" };
    let request = Interaction::post(endpoint);
    let request = match body {
        Some(body) => request.with_text(body),
        None => request,
    };
    Scenario::new(format!("Should not {} without {}", action, what)).step(request.expect_status(400))
}

fn auth_scenarios(endpoint: &str) -> Vec<Scenario> {
    vec![
        rejected_without(endpoint, "email", Some(PASSWORD)),
        rejected_without(endpoint, "password", Some(EMAIL)),
        rejected_without(endpoint, "body", None),
    ]
}

/// Signup, signin, profile edits and a full bookmark lifecycle, in that order.
pub fn bookmark_session() -> Result<Pipeline, PipelineError> {
    let mut scenarios = auth_scenarios("/auth/signup");
    scenarios.push(
        Scenario::new("Should signup").step(
            Interaction::post("/auth/signup")
                .with_json(credentials())
                .expect_status(201)
                .expect_json_path("access_token"),
        ),
    );
    scenarios.extend(auth_scenarios("/auth/signin"));
    scenarios.push(
        Scenario::new("Should signin").step(
            Interaction::post("/auth/signin")
                .with_json(credentials())
                .expect_status(200)
                .stores("userAccessToken", "access_token"),
        ),
    );

    scenarios.extend([
        Scenario::new("Should get current user").step(
            Interaction::get("/users/me")
                .with_bearer("$S{userAccessToken}")
                .expect_status(200)
                .expect_json_like(json!({ "email": EMAIL }))
                .stores("userId", "id"),
        ),
        Scenario::new("Should edit user").step(
            Interaction::patch("/users")
                .with_bearer("$S{userAccessToken}")
                .with_json(user_changes())
                .expect_status(200)
                .expect_json_like(user_changes()),
        ),
        Scenario::new("Should get empty bookmarks").step(
            Interaction::get("/bookmarks")
                .with_bearer("$S{userAccessToken}")
                .expect_status(200)
                .expect_json_length(0),
        ),
        Scenario::new("Should create bookmark").step(
            Interaction::post("/bookmarks")
                .with_bearer("$S{userAccessToken}")
                .with_json(new_bookmark())
                .expect_status(201)
                .expect_json_like(json!({
                    "title": "The Fall",
                    "description": "A short novel by Albert Camus",
                    "link": "https://en.wikipedia.org/wiki/The_Fall_(Camus_novel)",
                    "userId": "$S{userId}",
                }))
                .stores("bookmarkId", "id"),
        ),
        Scenario::new("Should get bookmarks").step(
            Interaction::get("/bookmarks")
                .with_bearer("$S{userAccessToken}")
                .expect_status(200)
                .expect_json_length(1)
                .expect_json_like(json!([{ "id": "$S{bookmarkId}" }])),
        ),
        Scenario::new("Should get bookmark by id").step(
            Interaction::get("/bookmarks/{id}")
                .with_path_param("id", "$S{bookmarkId}")
                .with_bearer("$S{userAccessToken}")
                .expect_status(200)
                .expect_json_like(json!({ "id": "$S{bookmarkId}", "title": "The Fall" })),
        ),
        Scenario::new("Should edit bookmark by id").step(
            Interaction::patch("/bookmarks/{id}")
                .with_path_param("id", "$S{bookmarkId}")
                .with_bearer("$S{userAccessToken}")
                .with_json(bookmark_changes())
                .expect_status(200)
                .expect_json_like(json!({
                    "id": "$S{bookmarkId}",
                    "title": "The Fall (Penguin Modern Classics)",
                    "description": "Clamence confesses in an Amsterdam bar",
                })),
        ),
        Scenario::new("Should delete bookmark by id").step(
            Interaction::delete("/bookmarks/{id}")
                .with_path_param("id", "$S{bookmarkId}")
                .with_bearer("$S{userAccessToken}")
                .expect_status(204),
        ),
        Scenario::new("Should get empty bookmarks after delete").step(
            Interaction::get("/bookmarks")
                .with_bearer("$S{userAccessToken}")
                .expect_status(200)
                .expect_json_length(0),
        ),
        Scenario::new("Should not get deleted bookmark").step(
            Interaction::get("/bookmarks/{id}")
                .with_path_param("id", "$S{bookmarkId}")
                .with_bearer("$S{userAccessToken}")
                .expect_status(404),
        ),
    ]);

    Pipeline::new(scenarios)
}
