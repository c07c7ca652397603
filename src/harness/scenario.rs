use super::context::ScenarioContext;
use super::driver::HttpDriver;
use super::interaction::Interaction;
use super::report::{Outcome, RunReport, ScenarioOutcome, StepFailure};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

/// A named use case made of interactions that run in order.
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    steps: Vec<Interaction>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, interaction: Interaction) -> Self {
        self.steps.push(interaction);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Interaction] {
        &self.steps
    }

    /// Keys this scenario reads that it does not store itself beforehand.
    pub fn requires(&self) -> BTreeSet<String> {
        let mut stored = BTreeSet::new();
        let mut required = BTreeSet::new();
        for step in &self.steps {
            for key in step.placeholders() {
                if !stored.contains(&key) {
                    required.insert(key);
                }
            }
            stored.extend(step.captures().iter().map(|capture| capture.key.clone()));
        }
        required
    }

    /// Keys this scenario stores for later ones.
    pub fn provides(&self) -> BTreeSet<String> {
        self.steps
            .iter()
            .flat_map(|step| step.captures().iter().map(|capture| capture.key.clone()))
            .collect()
    }

    async fn run(
        &self,
        driver: &HttpDriver,
        context: &mut ScenarioContext,
    ) -> Result<(), StepFailure> {
        for (index, step) in self.steps.iter().enumerate() {
            step.execute(driver, context)
                .await
                .map_err(|error| StepFailure {
                    step: index + 1,
                    interaction: step.describe(),
                    error,
                })?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("scenario `{0}` is declared more than once")]
    DuplicateScenario(String),
    #[error("scenario `{0}` has no interactions")]
    EmptyScenario(String),
    #[error("scenario `{scenario}` uses `{key}` before any earlier scenario stores it")]
    UnsatisfiedDependency { scenario: String, key: String },
}

/// `consumer` reads `key`, which was last stored by `provider`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub key: String,
    pub provider: String,
    pub consumer: String,
}

/// Scenarios in their fixed execution order, with validated data dependencies.
#[derive(Debug, Clone)]
pub struct Pipeline {
    scenarios: Vec<Scenario>,
    dependencies: Vec<Dependency>,
}

impl Pipeline {
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, PipelineError> {
        let mut names = HashSet::new();
        let mut providers: HashMap<String, String> = HashMap::new();
        let mut dependencies = Vec::new();

        for scenario in &scenarios {
            if scenario.steps.is_empty() {
                return Err(PipelineError::EmptyScenario(scenario.name.clone()));
            }
            if !names.insert(scenario.name.as_str()) {
                return Err(PipelineError::DuplicateScenario(scenario.name.clone()));
            }
            for key in scenario.requires() {
                let provider =
                    providers
                        .get(&key)
                        .ok_or_else(|| PipelineError::UnsatisfiedDependency {
                            scenario: scenario.name.clone(),
                            key: key.clone(),
                        })?;
                dependencies.push(Dependency {
                    provider: provider.clone(),
                    consumer: scenario.name.clone(),
                    key,
                });
            }
            for key in scenario.provides() {
                providers.insert(key, scenario.name.clone());
            }
        }

        Ok(Self {
            scenarios,
            dependencies,
        })
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Runs every scenario once, in order, against a fresh context.
    ///
    /// A failing scenario does not stop the run. Scenarios whose inputs were
    /// never stored are skipped and reported with the missing keys.
    #[tracing::instrument(name = "Run pipeline", skip_all, fields(base_url = %driver.base_url()))]
    pub async fn run(&self, driver: &HttpDriver) -> RunReport {
        let mut context = ScenarioContext::new();
        let mut outcomes = Vec::with_capacity(self.scenarios.len());

        for scenario in &self.scenarios {
            let started = Instant::now();
            let missing: Vec<String> = scenario
                .requires()
                .into_iter()
                .filter(|key| !context.contains(key))
                .collect();

            let outcome = if !missing.is_empty() {
                tracing::warn!(scenario = %scenario.name, ?missing, "Skipping scenario");
                Outcome::Skipped { missing }
            } else {
                match scenario.run(driver, &mut context).await {
                    Ok(()) => Outcome::Passed,
                    Err(failure) => {
                        tracing::error!(scenario = %scenario.name, "Scenario failed: {}", failure);
                        Outcome::Failed(failure)
                    }
                }
            };

            outcomes.push(ScenarioOutcome {
                name: scenario.name.clone(),
                outcome,
                elapsed: started.elapsed(),
            });
        }

        RunReport::new(outcomes, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sign_in() -> Scenario {
        Scenario::new("Should signin").step(
            Interaction::post("/auth/signin")
                .with_json(json!({"email": "test@test.com", "password": "p@ssword"}))
                .expect_status(200)
                .stores("userAccessToken", "access_token"),
        )
    }

    fn get_me() -> Scenario {
        Scenario::new("Should get current user").step(
            Interaction::get("/users/me")
                .with_bearer("$S{userAccessToken}")
                .expect_status(200),
        )
    }

    fn health() -> Scenario {
        Scenario::new("Should be healthy").step(Interaction::get("/health_check").expect_status(200))
    }

    #[test]
    fn requirements_exclude_values_stored_earlier_in_the_same_scenario() {
        let scenario = Scenario::new("Create then read")
            .step(
                Interaction::post("/bookmarks")
                    .with_bearer("$S{userAccessToken}")
                    .stores("bookmarkId", "id"),
            )
            .step(
                Interaction::get("/bookmarks/{id}")
                    .with_path_param("id", "$S{bookmarkId}")
                    .with_bearer("$S{userAccessToken}"),
            );
        assert_eq!(
            scenario.requires().into_iter().collect::<Vec<_>>(),
            vec!["userAccessToken"]
        );
        assert_eq!(
            scenario.provides().into_iter().collect::<Vec<_>>(),
            vec!["bookmarkId"]
        );
    }

    #[test]
    fn dependencies_are_derived_from_declared_order() {
        let pipeline = assert_ok!(Pipeline::new(vec![sign_in(), get_me()]));
        assert_eq!(
            pipeline.dependencies(),
            &[Dependency {
                key: "userAccessToken".into(),
                provider: "Should signin".into(),
                consumer: "Should get current user".into(),
            }]
        );
    }

    #[test]
    fn reading_a_value_before_it_is_stored_is_rejected() {
        let error = assert_err!(Pipeline::new(vec![get_me(), sign_in()]));
        assert_eq!(
            error,
            PipelineError::UnsatisfiedDependency {
                scenario: "Should get current user".into(),
                key: "userAccessToken".into(),
            }
        );
    }

    #[test]
    fn duplicate_and_empty_scenarios_are_rejected() {
        assert_eq!(
            assert_err!(Pipeline::new(vec![sign_in(), sign_in()])),
            PipelineError::DuplicateScenario("Should signin".into())
        );
        assert_eq!(
            assert_err!(Pipeline::new(vec![Scenario::new("Nothing")])),
            PipelineError::EmptyScenario("Nothing".into())
        );
    }

    #[tokio::test]
    async fn a_failed_provider_skips_dependents_but_not_independent_scenarios() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signin"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health_check"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let driver = HttpDriver::new(server.uri()).unwrap();

        let report = Pipeline::new(vec![sign_in(), get_me(), health()])
            .unwrap()
            .run(&driver)
            .await;

        assert!(!report.is_success());
        assert!(matches!(
            report.outcome("Should signin").unwrap().outcome,
            Outcome::Failed(ref failure) if failure.step == 1
        ));
        assert!(matches!(
            report.outcome("Should get current user").unwrap().outcome,
            Outcome::Skipped { ref missing } if missing == &vec!["userAccessToken".to_string()]
        ));
        assert!(matches!(
            report.outcome("Should be healthy").unwrap().outcome,
            Outcome::Passed
        ));
        assert_eq!((report.passed(), report.failed(), report.skipped()), (1, 1, 1));
    }

    #[tokio::test]
    async fn stored_values_flow_into_later_scenarios() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "jwt"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("Authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u-1"})))
            .expect(1)
            .mount(&server)
            .await;
        let driver = HttpDriver::new(server.uri()).unwrap();

        let report = Pipeline::new(vec![sign_in(), get_me()])
            .unwrap()
            .run(&driver)
            .await;

        assert!(report.is_success(), "{}", report);
        assert_eq!(report.context().get("userAccessToken"), Some("jwt"));
    }
}
