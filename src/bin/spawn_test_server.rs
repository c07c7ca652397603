// Spawns a reset backend instance for drivers running outside this crate.
// Build with: cargo build --bin spawn_test_server --features e2e-tests --release

#[cfg(feature = "e2e-tests")]
use bookmarks::test_support::{e2e_port, spawn_app_on_port};
#[cfg(feature = "e2e-tests")]
use std::io::{self, Write};

#[cfg(feature = "e2e-tests")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let test_name =
        std::env::var("TEST_NAME").unwrap_or_else(|_| format!("e2e-{}", uuid::Uuid::new_v4()));

    let app = spawn_app_on_port(&test_name, e2e_port()).await;
    app.reset().await;

    let output = serde_json::json!({
        "port": app.port,
        "address": app.address,
        "test_name": test_name
    });
    println!("{}", serde_json::to_string(&output)?);
    io::stdout().flush()?;

    tokio::signal::ctrl_c().await?;
    app.shutdown().await;

    Ok(())
}

#[cfg(not(feature = "e2e-tests"))]
fn main() {
    eprintln!("This binary requires the 'e2e-tests' feature to be enabled.");
    eprintln!("Build with: cargo build --bin spawn_test_server --features e2e-tests --release");
    std::process::exit(1);
}
