//! Open editor tabs

use serde::{Deserialize, Serialize};

/// Ordered open file ids plus the active one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSession {
    tabs: Vec<String>,
    active: Option<String>,
}

impl OpenSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `id` (appending it if absent) and make it active
    pub fn open_tab(&mut self, id: &str) {
        if !self.tabs.iter().any(|t| t == id) {
            self.tabs.push(id.to_string());
        }
        self.active = Some(id.to_string());
    }

    /// Close `id`; closing the active tab activates the last remaining one
    pub fn close_tab(&mut self, id: &str) {
        let Some(index) = self.tabs.iter().position(|t| t == id) else {
            return;
        };
        self.tabs.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.tabs.last().cloned();
        }
    }

    /// Drop every tab whose id fails `keep`
    pub fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        let closed: Vec<String> = self.tabs.iter().filter(|t| !keep(t)).cloned().collect();
        for id in closed {
            self.close_tab(&id);
        }
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(ids: &[&str]) -> OpenSession {
        let mut session = OpenSession::new();
        for id in ids {
            session.open_tab(id);
        }
        session
    }

    #[test]
    fn open_is_idempotent() {
        let mut session = opened(&["a", "b"]);
        session.open_tab("a");
        assert_eq!(session.tabs(), ["a", "b"]);
        assert_eq!(session.active(), Some("a"));
    }

    #[test]
    fn close_inactive_keeps_active() {
        let mut session = opened(&["a", "b", "c"]);
        session.close_tab("b");
        assert_eq!(session.tabs(), ["a", "c"]);
        assert_eq!(session.active(), Some("c"));
    }

    #[test]
    fn close_active_activates_last() {
        let mut session = opened(&["a", "b", "c"]);
        session.open_tab("b");
        session.close_tab("b");
        assert_eq!(session.tabs(), ["a", "c"]);
        assert_eq!(session.active(), Some("c"));

        session.close_tab("c");
        assert_eq!(session.active(), Some("a"));
    }

    #[test]
    fn close_only_tab_clears_active() {
        let mut session = opened(&["a"]);
        session.close_tab("a");
        assert!(session.tabs().is_empty());
        assert_eq!(session.active(), None);
    }

    #[test]
    fn close_unknown_is_noop() {
        let mut session = opened(&["a"]);
        session.close_tab("zzz");
        assert_eq!(session.active(), Some("a"));
    }

    #[test]
    fn serde_roundtrip_keeps_active() {
        let session = opened(&["a", "b"]);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["active"], "b");
        let back: OpenSession = serde_json::from_value(value).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn retain_closes_rejected() {
        let mut session = opened(&["a", "b", "c"]);
        session.retain(|id| id != "c");
        assert_eq!(session.tabs(), ["a", "b"]);
        assert_eq!(session.active(), Some("b"));
    }
}
