use bookmarks::test_support::{TestUser, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn me_returns_the_authenticated_user() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();
    let token = user.signup(&app).await;

    let response = app.get_me(&token).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], user.email.as_str());
    assert!(body["id"].is_string());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn me_requires_a_valid_bearer_token() {
    let app = spawn_app(test_name!()).await;

    let without_token = app
        .api_client
        .get(format!("{}/users/me", app.address))
        .send()
        .await
        .unwrap();
    let with_garbage = app.get_me("not-a-jwt").await;

    for response in [without_token, with_garbage] {
        assert_eq!(response.status().as_u16(), 401);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Authentication required");
    }
}

#[tokio::test]
async fn edit_user_echoes_supplied_fields_and_is_idempotent() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;
    let changes = json!({ "firstName": "Vladimir", "email": "vlad@codewithvlad.com" });

    for _ in 0..2 {
        let response = app.patch_user(&token, &changes).await;

        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["firstName"], "Vladimir");
        assert_eq!(body["email"], "vlad@codewithvlad.com");
        assert!(body["lastName"].is_null());
    }
}

#[tokio::test]
async fn edit_user_keeps_fields_that_are_not_supplied() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();
    let token = user.signup(&app).await;

    app.patch_user(&token, &json!({ "firstName": "Vladimir" })).await;
    let response = app.patch_user(&token, &json!({ "lastName": "Nikolaev" })).await;

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["firstName"], "Vladimir");
    assert_eq!(body["lastName"], "Nikolaev");
    assert_eq!(body["email"], user.email.as_str());
}

#[tokio::test]
async fn edit_user_to_a_taken_email_is_forbidden() {
    let app = spawn_app(test_name!()).await;
    let first = TestUser::generate();
    first.signup(&app).await;
    let token = TestUser::generate().signup(&app).await;

    let response = app.patch_user(&token, &json!({ "email": first.email })).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn edit_user_rejects_an_invalid_email() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;

    let response = app.patch_user(&token, &json!({ "email": "nope" })).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn edit_user_echoes_the_email_exactly_as_supplied() {
    let app = spawn_app(test_name!()).await;
    let token = TestUser::generate().signup(&app).await;

    let response = app
        .patch_user(&token, &json!({ "email": "Vlad@CodeWithVlad.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "Vlad@CodeWithVlad.com");
    let me: Value = app.get_me(&token).await.json().await.unwrap();
    assert_eq!(me["email"], "Vlad@CodeWithVlad.com");
}

#[tokio::test]
async fn emails_differing_only_in_case_are_the_same_account() {
    let app = spawn_app(test_name!()).await;
    let first = TestUser::generate();
    first.signup(&app).await;
    let token = TestUser::generate().signup(&app).await;

    let response = app
        .patch_user(&token, &json!({ "email": first.email.to_uppercase() }))
        .await;

    assert_eq!(response.status().as_u16(), 403);
}
