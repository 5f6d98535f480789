//! Fake backend for testing.
//!
//! Records every command it receives and answers from a script instead of
//! touching an installation, so reload and commit flows can be exercised in CI.

use crate::command::Command;
use crate::Backend;
use kitman_error::{GatewayError, GatewayResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A recorded command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub args: Value,
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Value),
    Fail(String),
}

#[derive(Debug, Default)]
struct FakeBackendState {
    invocations: Vec<Invocation>,
    script: HashMap<String, Scripted>,
}

/// Unscripted commands succeed with `null`.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeBackendState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `value` from now on.
    pub fn respond(&self, command: &str, value: Value) -> &Self {
        self.state
            .lock()
            .unwrap()
            .script
            .insert(command.to_string(), Scripted::Respond(value));
        self
    }

    /// Reject `command` with `message` from now on.
    pub fn fail(&self, command: &str, message: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .script
            .insert(command.to_string(), Scripted::Fail(message.to_string()));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().unwrap().invocations.clone()
    }

    pub fn invocation_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .invocations
            .iter()
            .map(|inv| inv.command.clone())
            .collect()
    }

    pub fn invocation_count(&self) -> usize {
        self.state.lock().unwrap().invocations.len()
    }

    pub fn has_invocation(&self, check: impl Fn(&Invocation) -> bool) -> bool {
        self.state.lock().unwrap().invocations.iter().any(check)
    }

    /// The most recent invocation of `command`, if any.
    pub fn last(&self, command: &str) -> Option<Invocation> {
        self.state
            .lock()
            .unwrap()
            .invocations
            .iter()
            .rev()
            .find(|inv| inv.command == command)
            .cloned()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().invocations.clear();
    }
}

impl Backend for FakeBackend {
    fn invoke(&self, command: &Command) -> GatewayResult<Value> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| GatewayError::Other("fake backend state poisoned".into()))?;
        state.invocations.push(Invocation {
            command: command.name().to_string(),
            args: command.args(),
        });
        log::info!("FAKE BACKEND: {}", command.name());

        match state.script.get(command.name()) {
            Some(Scripted::Respond(value)) => Ok(value.clone()),
            Some(Scripted::Fail(message)) => Err(GatewayError::rejected(command.name(), message)),
            None => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_commands_in_order() {
        let fake = FakeBackend::new();
        fake.invoke(&Command::GetInstallDir).unwrap();
        fake.invoke(&Command::GetInstalledKit { reload: true })
            .unwrap();

        assert_eq!(
            fake.invocation_names(),
            vec!["get_install_dir", "get_installed_kit"]
        );
        assert_eq!(
            fake.last("get_installed_kit").unwrap().args,
            json!({ "reload": true })
        );
    }

    #[test]
    fn scripted_failure_is_rejected() {
        let fake = FakeBackend::new();
        fake.fail("maybe_self_update", "offline");
        let err = fake.invoke(&Command::MaybeSelfUpdate).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Backend rejected `maybe_self_update`: offline"
        );
        assert_eq!(fake.invocation_count(), 1);
    }

    #[test]
    fn clear_forgets_invocations_but_keeps_script() {
        let fake = FakeBackend::new();
        fake.respond("check_manager_version", json!(true));
        fake.invoke(&Command::CheckManagerVersion).unwrap();
        fake.clear();
        assert_eq!(fake.invocation_count(), 0);
        assert_eq!(
            fake.invoke(&Command::CheckManagerVersion).unwrap(),
            json!(true)
        );
    }
}
