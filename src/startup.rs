use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api_doc::openapi_json;
use crate::authentication::{TokenIssuer, require_auth};
use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{
    create_bookmark, delete_bookmark, edit_bookmark, edit_user, get_bookmark_by_id, get_bookmarks,
    get_me, health_check, signin, signup,
};

pub fn get_connection_pool(db_configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(db_configuration.connect_options())
}

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub token_issuer: TokenIssuer,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let token_issuer = TokenIssuer::new(
            &configuration.auth.jwt_secret,
            configuration.auth.access_token_ttl(),
        );
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();
        let router = build_router(AppState {
            db: connection_pool,
            token_issuer,
        });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then finish in-flight requests and release the port.
    pub async fn run_until<F>(self, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::from_std(self.listener)?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/users/me", get(get_me))
        .route("/users", patch(edit_user))
        .route("/bookmarks", get(get_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/{id}",
            get(get_bookmark_by_id)
                .patch(edit_bookmark)
                .delete(delete_bookmark),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health_check", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
