//! A small driver for stateful HTTP scenarios.
//!
//! A [`Pipeline`] is an ordered list of named [`Scenario`]s, each made of
//! [`Interaction`]s: one request, the expectations its response must meet and
//! the values to store from it. Stored values live in a [`ScenarioContext`]
//! owned by a single run and are referenced from later requests as `$S{key}`.
//!
//! Ordering requirements are explicit: a pipeline refuses to build when a
//! scenario references a key that no earlier scenario stores, and at run time
//! a scenario whose inputs were never produced is skipped instead of failing
//! with a confusing request error.

mod context;
mod driver;
mod error;
mod expectation;
mod interaction;
pub mod json;
mod report;
mod scenario;

pub use context::{ScenarioContext, json_placeholders, placeholders};
pub use driver::{Exchange, HttpDriver, PreparedRequest};
pub use error::HarnessError;
pub use expectation::{AssertionFailure, Expectation};
pub use interaction::{Capture, Interaction, RequestBody};
pub use report::{Outcome, RunReport, ScenarioOutcome, StepFailure};
pub use scenario::{Dependency, Pipeline, PipelineError, Scenario};
