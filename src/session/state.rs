use crate::validation::ValidationError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// No unsaved edits.
    Clean,
    Dirty,
    /// A save is in flight.
    Validating,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionState::Clean => "clean",
            SessionState::Dirty => "dirty",
            SessionState::Validating => "validating",
            SessionState::Closed => "closed",
        };
        f.write_str(text)
    }
}

/// How a save attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The host accepted the document.
    Saved,
    /// Local validation failed; the host was not contacted.
    Refused(Vec<ValidationError>),
    /// The host rejected the document with these errors.
    Failed(Vec<ValidationError>),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            SaveOutcome::Saved => &[],
            SaveOutcome::Refused(errors) | SaveOutcome::Failed(errors) => errors,
        }
    }
}
