use bookmarks::configuration::get_configuration;
use bookmarks::startup::Application;
use bookmarks::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("bookmarks".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    let application = Application::build(configuration).await?;
    application.run_until(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for the shutdown signal: {}", e);
        // Without a signal handler the server keeps running until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
