//! Redirect side effect of an access denial

use std::sync::Mutex;

/// Sends the client somewhere else
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Logs redirects; for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!(target: "portal::navigation", path, "redirect");
    }
}

/// Remembers every redirect in order
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        RecordingNavigator::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn last(&self) -> Option<String> {
        self.redirects().pop()
    }

    pub fn count(&self) -> usize {
        self.redirects().len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        tracing::debug!(path, "redirect recorded");
        match self.visits.lock() {
            Ok(mut visits) => visits.push(path.to_string()),
            Err(poisoned) => poisoned.into_inner().push(path.to_string()),
        }
    }
}
