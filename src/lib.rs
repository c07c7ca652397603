pub mod api_doc;
pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod harness;
pub mod routes;
pub mod startup;
pub mod suite;
pub mod telemetry;

// Test support utilities only available with e2e-tests feature
#[cfg(feature = "e2e-tests")]
pub mod test_support;
