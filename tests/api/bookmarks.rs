use bookmarks::test_support::{TestUser, spawn_app};
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn created_bookmark_is_listed_for_its_owner() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;

    let response = app
        .post_bookmark(
            &token,
            &json!({
                "title": "The Fall",
                "description": "A short novel by Albert Camus",
                "link": "https://en.wikipedia.org/wiki/The_Fall_(Camus_novel)",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["title"], "The Fall");
    assert_eq!(created["description"], "A short novel by Albert Camus");

    let listed: Value = app.get_bookmarks(&token).await.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn bookmark_owner_comes_from_the_token_not_the_body() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;
    let me: Value = app.get_me(&token).await.json().await.unwrap();

    let response = app
        .post_bookmark(
            &token,
            &json!({
                "title": "The Fall",
                "link": "https://example.com",
                "userId": Uuid::new_v4().to_string(),
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["userId"], me["id"]);
}

#[tokio::test]
async fn create_bookmark_requires_title_and_link() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;

    for body in [
        json!({ "link": "https://example.com" }),
        json!({ "title": "The Fall" }),
    ] {
        let response = app.post_bookmark(&token, &body).await;
        assert_eq!(response.status().as_u16(), 400, "payload: {}", body);
    }
}

#[tokio::test]
async fn bookmarks_of_other_users_are_not_listed() {
    let app = spawn_app(test_name!()).await;
    let owner = TestUser::generate().signup(&app).await;
    let other = TestUser::generate().signup(&app).await;
    app.create_bookmark(&owner, "The Fall").await;

    let listed: Value = app.get_bookmarks(&other).await.json().await.unwrap();

    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn edit_bookmark_echoes_the_new_title() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;
    let id = app.create_bookmark(&token, "The Fall").await;

    let response = app
        .patch_bookmark(&token, &id, &json!({ "title": "The Plague" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "The Plague");
    assert_eq!(body["id"], id.as_str());
}

#[tokio::test]
async fn deleted_bookmark_is_gone() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;
    let id = app.create_bookmark(&token, "The Fall").await;

    assert_eq!(app.delete_bookmark(&token, &id).await.status().as_u16(), 204);
    assert_eq!(app.get_bookmark(&token, &id).await.status().as_u16(), 404);
    assert_eq!(app.delete_bookmark(&token, &id).await.status().as_u16(), 404);
}

#[tokio::test]
async fn bookmarks_of_other_users_cannot_be_read_or_changed() {
    let app = spawn_app(test_name!()).await;
    let owner = TestUser::generate().signup(&app).await;
    let other = TestUser::generate().signup(&app).await;
    let id = app.create_bookmark(&owner, "The Fall").await;

    assert_eq!(app.get_bookmark(&other, &id).await.status().as_u16(), 404);

    let edit = app
        .patch_bookmark(&other, &id, &json!({ "title": "Mine now" }))
        .await;
    assert_eq!(edit.status().as_u16(), 403);
    let body: Value = edit.json().await.unwrap();
    assert_eq!(body["error"], "Access to resource denied");

    assert_eq!(app.delete_bookmark(&other, &id).await.status().as_u16(), 403);
    assert_eq!(app.get_bookmark(&owner, &id).await.status().as_u16(), 200);
}

#[tokio::test]
async fn missing_bookmarks_are_not_found() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;
    let id = Uuid::new_v4().to_string();

    assert_eq!(app.get_bookmark(&token, &id).await.status().as_u16(), 404);
    assert_eq!(
        app.patch_bookmark(&token, &id, &json!({ "title": "x" }))
            .await
            .status()
            .as_u16(),
        404
    );
    assert_eq!(app.delete_bookmark(&token, &id).await.status().as_u16(), 404);
}

#[tokio::test]
async fn malformed_bookmark_ids_are_bad_requests() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;

    let response = app.get_bookmark(&token, "not-a-uuid").await;

    assert_eq!(response.status().as_u16(), 400);
}
