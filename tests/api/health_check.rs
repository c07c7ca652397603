use bookmarks::test_support::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app(test_name!()).await;

    let response = app
        .api_client
        .get(format!("{}/health_check", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn openapi_document_lists_the_bookmark_routes() {
    let app = spawn_app(test_name!()).await;

    let response = app
        .api_client
        .get(format!("{}/api-docs/openapi.json", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
    let document: serde_json::Value = response.json().await.unwrap();
    assert!(document["paths"]["/bookmarks/{id}"].is_object());
    assert!(document["paths"]["/auth/signin"].is_object());
}
