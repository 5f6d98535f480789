//! Per-step outcome of a load sequence.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The slice was written.
    Completed,
    /// Nothing to update (empty or mismatched response); previous state kept.
    Unchanged,
    /// Turned off by configuration.
    Skipped,
    /// The backend call failed; previous state kept.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub steps: Vec<StepResult>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, outcome: anyhow::Result<StepStatus>) {
        let (status, error) = match outcome {
            Ok(status) => (status, None),
            Err(err) => (StepStatus::Failed, Some(format!("{:#}", err))),
        };
        self.steps.push(StepResult {
            name: name.to_string(),
            status,
            error,
        });
    }

    pub fn extend(&mut self, other: LoadReport) {
        self.steps.extend(other.steps);
    }

    pub fn status_of(&self, name: &str) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.name == name).map(|s| s.status)
    }

    pub fn failed(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| s.status == StepStatus::Failed)
    }

    pub fn is_clean(&self) -> bool {
        self.failed().next().is_none()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match &step.error {
                Some(err) => writeln!(f, "{:<20} {:?}: {}", step.name, step.status, err)?,
                None => writeln!(f, "{:<20} {:?}", step.name, step.status)?,
            }
        }
        Ok(())
    }
}
