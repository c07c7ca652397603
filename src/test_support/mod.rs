//! Test support utilities for integration and E2E tests.
//! Only available when the `e2e-tests` feature is enabled.

pub mod helpers;
pub mod test_app;

pub use helpers::{configure_database, reset_database};
pub use test_app::{DEFAULT_E2E_PORT, TestApp, TestUser, e2e_port, spawn_app, spawn_app_on_port};
