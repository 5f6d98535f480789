//! Kitman backend gateway.
//!
//! Every request to the privileged installer backend goes through a single
//! entry point: invoke a named command with JSON arguments and get a JSON value
//! back. Failures are shown to the user through a [`NoticeSink`] and then
//! handed back to the caller unchanged.

pub mod command;
pub mod dir_backend;
pub mod events;
pub mod fake_backend;
pub mod notice;
pub mod wire;

pub use command::Command;
pub use dir_backend::DirBackend;
pub use events::{BackendEvent, EventListeners, ListenerId};
pub use fake_backend::{FakeBackend, Invocation};
pub use kitman_error::{GatewayError, GatewayResult};
pub use notice::{LogNotice, Notice, NoticeSink, RecordingNotice};
pub use wire::{WireComponent, WireKit, WireToolInstaller};

use serde_json::Value;

/// Shown when a failed command carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred";

/// Something that can execute backend commands.
///
/// Implementations: [`DirBackend`] (file-backed stand-in for the real
/// installer) and [`FakeBackend`] (scripted, records every call).
pub trait Backend: Send + Sync {
    fn invoke(&self, command: &Command) -> GatewayResult<Value>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn invoke(&self, command: &Command) -> GatewayResult<Value> {
        (**self).invoke(command)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn invoke(&self, command: &Command) -> GatewayResult<Value> {
        (**self).invoke(command)
    }
}

/// Uniform "invoke, surface failure, re-propagate" wrapper around a backend.
pub struct Gateway<B> {
    backend: B,
    notices: Box<dyn NoticeSink>,
}

impl<B: Backend> Gateway<B> {
    pub fn new(backend: B) -> Self {
        Self::with_notices(backend, LogNotice)
    }

    pub fn with_notices(backend: B, notices: impl NoticeSink + 'static) -> Self {
        Self {
            backend,
            notices: Box::new(notices),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn invoke(&self, command: &Command) -> GatewayResult<Value> {
        log::debug!("invoking backend command `{}`", command.name());
        match self.backend.invoke(command) {
            Ok(value) => Ok(value),
            Err(err) => {
                let message = err
                    .user_message()
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                self.notices.show(&Notice::error(message));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn successful_invoke_returns_value_without_notice() {
        let fake = FakeBackend::new();
        fake.respond("get_install_dir", json!("/opt/kit"));
        let notices = RecordingNotice::new();
        let gateway = Gateway::with_notices(fake.clone(), notices.clone());

        let value = gateway.invoke(&Command::GetInstallDir).unwrap();
        assert_eq!(value, json!("/opt/kit"));
        assert!(notices.notices().is_empty());
        assert_eq!(fake.invocation_names(), vec!["get_install_dir"]);
    }

    #[test]
    fn failure_is_shown_then_propagated() {
        let fake = FakeBackend::new();
        fake.fail("get_installed_kit", "record file is corrupted");
        let notices = RecordingNotice::new();
        let gateway = Gateway::with_notices(fake, notices.clone());

        let err = gateway
            .invoke(&Command::GetInstalledKit { reload: true })
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { .. }));

        let shown = notices.notices();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "record file is corrupted");
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let fake = FakeBackend::new();
        fake.fail("get_available_kits", "");
        let notices = RecordingNotice::new();
        let gateway = Gateway::with_notices(fake, notices.clone());

        assert!(gateway
            .invoke(&Command::GetAvailableKits { reload: false })
            .is_err());
        assert_eq!(notices.notices()[0].message, GENERIC_FAILURE_MESSAGE);
    }
}
