#![cfg(feature = "e2e-tests")]

//! Endpoint tests against a live instance, one fresh database per test.

#[macro_use]
mod macros;

mod auth;
mod bookmarks;
mod health_check;
mod users;
