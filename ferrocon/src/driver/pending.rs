//! Tracking of asynchronous command completions.
//!
//! Some commands return immediately but finish later, announcing completion
//! with an unsolicited line of output. Their completion markers are kept here
//! until a later read contains them.

use indexmap::IndexSet;

/// Completion markers registered but not yet observed.
///
/// Iteration follows registration order.
#[derive(Debug, Clone, Default)]
pub struct PendingCompletions {
    markers: IndexSet<String>,
}

impl PendingCompletions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for `marker`. Returns false if it was already pending.
    pub fn register(&mut self, marker: impl Into<String>) -> bool {
        self.markers.insert(marker.into())
    }

    /// Remove every pending marker contained in `response`.
    ///
    /// Returns the removed markers in registration order. Markers not present
    /// in the response stay pending.
    pub fn observe(&mut self, response: &str) -> Vec<String> {
        if response.is_empty() || self.markers.is_empty() {
            return vec![];
        }

        let seen: Vec<String> = self
            .markers
            .iter()
            .filter(|marker| response.contains(marker.as_str()))
            .cloned()
            .collect();

        for marker in &seen {
            self.markers.shift_remove(marker);
        }
        seen
    }

    /// Check if a marker is pending.
    pub fn contains(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    /// Number of pending markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Pending markers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    /// Copy of the pending markers.
    pub fn to_vec(&self) -> Vec<String> {
        self.markers.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_removes_only_matching_marker() {
        let mut pending = PendingCompletions::new();
        pending.register("RSA Key pair is successfully created");
        pending.register("ssl-certificate creation is successful");

        let seen = pending.observe("\r\nRSA Key pair is successfully created\r\n");

        assert_eq!(seen, ["RSA Key pair is successfully created"]);
        assert_eq!(pending.len(), 1);
        assert!(pending.contains("ssl-certificate creation is successful"));
    }

    #[test]
    fn test_one_response_can_satisfy_several_markers() {
        let mut pending = PendingCompletions::new();
        pending.register("first done");
        pending.register("second done");
        pending.register("third done");

        let seen = pending.observe("second done\r\nfirst done");

        assert_eq!(seen, ["first done", "second done"]);
        assert_eq!(pending.iter().collect::<Vec<_>>(), ["third done"]);
    }

    #[test]
    fn test_repeated_marker_text_removes_once() {
        let mut pending = PendingCompletions::new();
        pending.register("done");

        assert_eq!(pending.observe("done done done"), ["done"]);
        assert!(pending.observe("done").is_empty());
        assert!(pending.is_empty());
    }

    #[test]
    fn test_register_is_a_set() {
        let mut pending = PendingCompletions::new();
        assert!(pending.register("done"));
        assert!(!pending.register("done"));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_empty_response_observes_nothing() {
        let mut pending = PendingCompletions::new();
        pending.register("done");
        assert!(pending.observe("").is_empty());
        assert_eq!(pending.to_vec(), ["done"]);
    }
}
