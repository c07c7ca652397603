use crate::configuration::get_configuration;
use crate::harness::HttpDriver;
use crate::startup::Application;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::LazyLock;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::helpers::{TRACING, configure_database, reset_database};

/// Port the ordered E2E suite binds unless `E2E_PORT` says otherwise.
pub const DEFAULT_E2E_PORT: u16 = 3333;

pub fn e2e_port() -> u16 {
    std::env::var("E2E_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_E2E_PORT)
}

/// A running application instance backed by its own database.
///
/// The server stops when [`TestApp::shutdown`] is awaited or when the value is dropped.
#[derive(Debug)]
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db_connection_pool: PgPool,
    pub api_client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<Result<(), std::io::Error>>>,
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        Self {
            email: format!("{}@example.com", Uuid::new_v4()),
            password: Uuid::new_v4().to_string(),
        }
    }

    pub fn credentials(&self) -> Value {
        json!({ "email": self.email, "password": self.password })
    }

    /// Sign the user up and return its access token.
    pub async fn signup(&self, app: &TestApp) -> String {
        let response = app.post_signup(&self.credentials()).await;
        assert_eq!(response.status().as_u16(), 201, "Failed to sign up test user.");
        access_token(response).await
    }

    pub async fn signin(&self, app: &TestApp) -> String {
        let response = app.post_signin(&self.credentials()).await;
        assert_eq!(response.status().as_u16(), 200, "Failed to sign in test user.");
        access_token(response).await
    }
}

async fn access_token(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse token response.");
    body["access_token"]
        .as_str()
        .expect("Response has no access_token.")
        .to_string()
}

impl TestApp {
    /// A harness driver pointed at this instance.
    pub fn driver(&self) -> HttpDriver {
        HttpDriver::with_client(self.api_client.clone(), &self.address)
            .expect("Failed to build HTTP driver.")
    }

    pub async fn reset(&self) {
        reset_database(&self.db_connection_pool)
            .await
            .expect("Failed to reset database.");
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(server) = self.server.take() {
            server
                .await
                .expect("Server task panicked.")
                .expect("Server failed while shutting down.");
        }
    }

    pub async fn post_raw(&self, path: &str, content_type: &str, body: String) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", &self.address, path))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signup(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/auth/signup", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signin(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/auth/signin", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_me(&self, token: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/users/me", &self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch_user(&self, token: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .patch(format!("{}/users", &self.address))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_bookmark(&self, token: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/bookmarks", &self.address))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_bookmarks(&self, token: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/bookmarks", &self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_bookmark(&self, token: &str, id: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/bookmarks/{}", &self.address, id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch_bookmark(&self, token: &str, id: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .patch(format!("{}/bookmarks/{}", &self.address, id))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_bookmark(&self, token: &str, id: &str) -> reqwest::Response {
        self.api_client
            .delete(format!("{}/bookmarks/{}", &self.address, id))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Create a bookmark and return its id.
    pub async fn create_bookmark(&self, token: &str, title: &str) -> String {
        let response = self
            .post_bookmark(
                token,
                &json!({ "title": title, "link": format!("https://example.com/{}", Uuid::new_v4()) }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201, "Failed to create bookmark.");
        let body: Value = response.json().await.expect("Failed to parse bookmark.");
        body["id"].as_str().expect("Bookmark has no id.").to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Spawn an instance on an OS-assigned port with a fresh `test-{test_name}` database.
pub async fn spawn_app(test_name: impl AsRef<str>) -> TestApp {
    spawn_app_on_port(test_name, 0).await
}

#[tracing::instrument(name = "Spawning test application", skip(test_name))]
pub async fn spawn_app_on_port(test_name: impl AsRef<str>, port: u16) -> TestApp {
    LazyLock::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.database.database_name = format!("test-{}", test_name.as_ref());
        c.application.port = port;
        c
    };

    let db_connection_pool = configure_database(&configuration.database).await;

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let address = format!("http://127.0.0.1:{}", port);

    let (shutdown, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(application.run_until(async move {
        let _ = stopped.await;
    }));

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build HTTP client.");

    TestApp {
        address,
        port,
        db_connection_pool,
        api_client,
        shutdown: Some(shutdown),
        server: Some(server),
    }
}
