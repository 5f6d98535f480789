//! Push events emitted by the backend while it works.
//!
//! This is the only backend -> client channel; nothing here is polled.

use kitman_error::ShapeError;
use serde_json::Value;

pub const INSTALL_PROGRESS_EVENT: &str = "install-progress";
pub const INSTALL_DETAILS_EVENT: &str = "install-details";
pub const INSTALL_COMPLETE_EVENT: &str = "install-complete";
pub const FOLDER_SELECTED_EVENT: &str = "folder-selected";

#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Overall progress in percent.
    InstallProgress(f32),
    InstallDetails(String),
    InstallComplete,
    /// An empty path means the user cancelled the dialog.
    FolderSelected(String),
}

impl BackendEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BackendEvent::InstallProgress(_) => INSTALL_PROGRESS_EVENT,
            BackendEvent::InstallDetails(_) => INSTALL_DETAILS_EVENT,
            BackendEvent::InstallComplete => INSTALL_COMPLETE_EVENT,
            BackendEvent::FolderSelected(_) => FOLDER_SELECTED_EVENT,
        }
    }

    pub fn parse(name: &str, payload: &Value) -> Result<Self, ShapeError> {
        match name {
            INSTALL_PROGRESS_EVENT => payload
                .as_f64()
                .map(|pct| BackendEvent::InstallProgress(pct as f32))
                .ok_or_else(|| ShapeError::new("numeric progress", payload.to_string())),
            INSTALL_DETAILS_EVENT => payload
                .as_str()
                .map(|s| BackendEvent::InstallDetails(s.to_string()))
                .ok_or_else(|| ShapeError::new("detail text", payload.to_string())),
            INSTALL_COMPLETE_EVENT => Ok(BackendEvent::InstallComplete),
            FOLDER_SELECTED_EVENT => match payload {
                Value::Null => Ok(BackendEvent::FolderSelected(String::new())),
                Value::String(path) => Ok(BackendEvent::FolderSelected(path.clone())),
                other => Err(ShapeError::new("folder path", other.to_string())),
            },
            other => Err(ShapeError::new("known event name", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&BackendEvent)>;

/// Registered event listeners, called in registration order.
#[derive(Default)]
pub struct EventListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&mut self, listener: impl FnMut(&BackendEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, event: &BackendEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn parses_known_events() {
        assert_eq!(
            BackendEvent::parse("install-progress", &json!(42.5)).unwrap(),
            BackendEvent::InstallProgress(42.5)
        );
        assert_eq!(
            BackendEvent::parse("install-details", &json!("unpacking cargo")).unwrap(),
            BackendEvent::InstallDetails("unpacking cargo".into())
        );
        assert_eq!(
            BackendEvent::parse("install-complete", &json!(null)).unwrap(),
            BackendEvent::InstallComplete
        );
        assert_eq!(
            BackendEvent::parse("folder-selected", &json!(null)).unwrap(),
            BackendEvent::FolderSelected(String::new())
        );
    }

    #[test]
    fn rejects_wrong_payload_shape() {
        let err = BackendEvent::parse("install-progress", &json!("50%")).unwrap_err();
        assert_eq!(err.expected, "numeric progress");
        assert!(BackendEvent::parse("window-moved", &json!({})).is_err());
    }

    #[test]
    fn dispatch_reaches_listeners_until_removed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = EventListeners::new();
        let sink = Rc::clone(&seen);
        let id = listeners.listen(move |event| sink.borrow_mut().push(event.name()));

        listeners.dispatch(&BackendEvent::InstallComplete);
        assert!(listeners.unlisten(id));
        listeners.dispatch(&BackendEvent::InstallComplete);

        assert_eq!(seen.borrow().as_slice(), &["install-complete"]);
        assert!(listeners.is_empty());
    }
}
