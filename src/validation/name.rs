use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// What a caller must do to learn whether a name is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    /// The name was checked before; no remote call is needed.
    Cached(bool),
    /// A remote check for this name is already outstanding.
    Pending,
    /// A remote check must be issued.
    Required,
    /// Empty names are never checked remotely.
    Skipped,
}

/// Memo of remote name-availability answers, keyed by the checked name.
#[derive(Debug, Clone, Default)]
pub struct NameAvailability {
    memo: AHashMap<String, bool>,
    pending: AHashSet<String>,
    current: Option<String>,
}

impl NameAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `name` the current name and reports whether a remote check is needed.
    pub fn begin(&mut self, name: &str) -> NameCheck {
        if name.trim().is_empty() {
            self.current = None;
            return NameCheck::Skipped;
        }
        self.current = Some(name.to_string());
        if let Some(&available) = self.memo.get(name) {
            return NameCheck::Cached(available);
        }
        if self.pending.contains(name) {
            return NameCheck::Pending;
        }
        self.pending.insert(name.to_string());
        NameCheck::Required
    }

    /// Records a remote answer for `name`.
    ///
    /// Returns `true` when the answer concerns the current name. Answers for
    /// names the user has since moved away from are memoized but not applied.
    pub fn resolve(&mut self, name: &str, available: bool) -> bool {
        self.pending.remove(name);
        self.memo.insert(name.to_string(), available);
        let applies = self.current.as_deref() == Some(name);
        if !applies {
            debug!(name, available, "Discarding stale name availability result");
        }
        applies
    }

    /// The known answer for the current name; `None` while pending or unchecked.
    pub fn outcome(&self) -> Option<bool> {
        self.current
            .as_deref()
            .and_then(|name| self.memo.get(name).copied())
    }

    /// The memoized answer for `name`, if one arrived.
    pub fn known(&self, name: &str) -> Option<bool> {
        self.memo.get(name).copied()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.current
            .as_deref()
            .is_some_and(|name| self.pending.contains(name))
    }

    /// Forgets a pending check, e.g. when its request could not be sent.
    pub fn abandon(&mut self, name: &str) {
        self.pending.remove(name);
    }

    pub fn clear(&mut self) {
        self.memo.clear();
        self.pending.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_check_is_required_then_pending() {
        let mut names = NameAvailability::new();
        assert_eq!(names.begin("pipeline1"), NameCheck::Required);
        assert_eq!(names.begin("pipeline1"), NameCheck::Pending);
        assert!(names.is_pending());
        assert_eq!(names.outcome(), None);
    }

    #[test]
    fn resolved_names_are_memoized() {
        let mut names = NameAvailability::new();
        names.begin("pipeline1");
        assert!(names.resolve("pipeline1", false));
        assert_eq!(names.outcome(), Some(false));
        assert_eq!(names.begin("pipeline1"), NameCheck::Cached(false));
    }

    #[test]
    fn stale_results_do_not_apply_to_the_current_name() {
        let mut names = NameAvailability::new();
        names.begin("pipeline1");
        names.begin("pipeline2");
        assert!(!names.resolve("pipeline1", false));
        assert_eq!(names.outcome(), None);
        assert!(names.is_pending());
        assert_eq!(names.begin("pipeline1"), NameCheck::Cached(false));
    }

    #[test]
    fn empty_names_are_skipped() {
        let mut names = NameAvailability::new();
        assert_eq!(names.begin("  "), NameCheck::Skipped);
        assert_eq!(names.current(), None);
        assert!(!names.is_pending());
    }
}
