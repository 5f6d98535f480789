//! Installation progress accumulated from backend push events.

use kitman_gateway::BackendEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallProgress {
    pub percent: f32,
    pub details: Vec<String>,
    pub complete: bool,
}

impl InstallProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event in. Returns `false` for events that are not about progress.
    pub fn apply(&mut self, event: &BackendEvent) -> bool {
        match event {
            BackendEvent::InstallProgress(pct) => {
                self.percent = pct.clamp(0.0, 100.0);
                true
            }
            BackendEvent::InstallDetails(line) => {
                self.details.push(line.clone());
                true
            }
            BackendEvent::InstallComplete => {
                self.percent = 100.0;
                self.complete = true;
                true
            }
            BackendEvent::FolderSelected(_) => false,
        }
    }
}
