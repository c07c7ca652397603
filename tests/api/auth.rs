use bookmarks::test_support::{TestUser, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn signup_returns_201_and_an_access_token() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();

    let response = app.post_signup(&user.credentials()).await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn signup_and_signin_reject_incomplete_payloads() {
    let app = spawn_app(test_name!()).await;
    let test_cases = vec![
        ("text/plain", "p@ssword".to_string(), "only a password"),
        ("text/plain", "test@test.com".to_string(), "only an email"),
        ("application/json", "".to_string(), "no body"),
        ("application/json", r#"{"email":"test@test.com"}"#.to_string(), "missing password"),
        ("application/json", r#"{"password":"p@ssword"}"#.to_string(), "missing email"),
        (
            "application/json",
            r#"{"email":"not-an-email","password":"p@ssword"}"#.to_string(),
            "invalid email",
        ),
        ("application/json", r#"{"email":"test@test.com","password":""}"#.to_string(), "empty password"),
    ];

    for path in ["/auth/signup", "/auth/signin"] {
        for (content_type, body, description) in &test_cases {
            let response = app.post_raw(path, content_type, body.clone()).await;

            assert_eq!(
                400,
                response.status().as_u16(),
                "{} did not fail with 400 Bad Request when the payload was {}.",
                path,
                description
            );
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["success"], false);
        }
    }
}

#[tokio::test]
async fn signup_with_a_taken_email_is_forbidden() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();
    user.signup(&app).await;

    let response = app.post_signup(&user.credentials()).await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Credentials taken");
}

#[tokio::test]
async fn signup_ignores_unknown_properties() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();

    let response = app
        .post_signup(&json!({
            "email": user.email,
            "password": user.password,
            "isAdmin": true,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn signin_returns_an_access_token_for_valid_credentials() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();
    user.signup(&app).await;

    let response = app.post_signin(&user.credentials()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let token = body["access_token"].as_str().unwrap();
    assert_eq!(app.get_me(token).await.status().as_u16(), 200);
}

#[tokio::test]
async fn signin_with_wrong_password_is_forbidden() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser::generate();
    user.signup(&app).await;

    let response = app
        .post_signin(&json!({ "email": user.email, "password": "wrong-password" }))
        .await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Credentials incorrect");
}

#[tokio::test]
async fn signin_with_unknown_email_is_forbidden() {
    let app = spawn_app(test_name!()).await;

    let response = app.post_signin(&TestUser::generate().credentials()).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn signup_keeps_the_email_case_and_signin_ignores_it() {
    let app = spawn_app(test_name!()).await;
    let user = TestUser {
        email: format!("Mixed.Case-{}@Example.com", uuid::Uuid::new_v4()),
        password: "p@ssword".to_string(),
    };
    let token = user.signup(&app).await;

    let me: Value = app.get_me(&token).await.json().await.unwrap();
    assert_eq!(me["email"], user.email.as_str());

    let response = app
        .post_signin(&json!({ "email": user.email.to_lowercase(), "password": user.password }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let duplicate = app
        .post_signup(&json!({ "email": user.email.to_uppercase(), "password": "other" }))
        .await;
    assert_eq!(duplicate.status().as_u16(), 403);
}
