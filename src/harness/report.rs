use super::context::ScenarioContext;
use super::error::HarnessError;
use std::fmt;
use std::time::Duration;

/// The interaction that failed a scenario, counted from 1.
#[derive(Debug)]
pub struct StepFailure {
    pub step: usize,
    pub interaction: String,
    pub error: HarnessError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({}): {}", self.step, self.interaction, self.error)
    }
}

#[derive(Debug)]
pub enum Outcome {
    Passed,
    Failed(StepFailure),
    Skipped { missing: Vec<String> },
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

/// Result of one pipeline run, in execution order.
#[derive(Debug)]
pub struct RunReport {
    outcomes: Vec<ScenarioOutcome>,
    context: ScenarioContext,
}

impl RunReport {
    pub fn new(outcomes: Vec<ScenarioOutcome>, context: ScenarioContext) -> Self {
        Self { outcomes, context }
    }

    pub fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    /// Values stored during the run.
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped { .. }))
    }

    /// True when every scenario ran and passed.
    pub fn is_success(&self) -> bool {
        self.passed() == self.outcomes.len()
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.outcome))
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scenario in &self.outcomes {
            let millis = scenario.elapsed.as_millis();
            match &scenario.outcome {
                Outcome::Passed => writeln!(f, "PASS {} ({} ms)", scenario.name, millis)?,
                Outcome::Failed(failure) => {
                    writeln!(f, "FAIL {} ({} ms)", scenario.name, millis)?;
                    writeln!(f, "     {}", failure)?;
                }
                Outcome::Skipped { missing } => writeln!(
                    f,
                    "SKIP {} (never stored: {})",
                    scenario.name,
                    missing.join(", ")
                )?,
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}
