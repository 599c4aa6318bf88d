//! Circulars domain model.
//!
//! Circulars are the append-mostly astronomy bulletins of the portal.
//! Identifiers are strictly increasing integers assigned by the store's
//! atomic counter at write time, never by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum subject length accepted by the validators.
pub const MAX_SUBJECT_LENGTH: usize = 256;

/// A published circular.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circular {
    /// Strictly increasing identifier assigned by the store.
    pub circular_id: u64,
    /// Subject line.
    pub subject: String,
    /// Bulletin body.
    pub body: String,
    /// Identity of the submitter.
    pub submitter: String,
    /// Timestamp assigned at write time.
    pub created_on: DateTime<Utc>,
    /// Optional associated astronomical event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Caller-supplied fields of a circular, before the store assigns the
/// identifier and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularSubmission {
    /// Subject line.
    pub subject: String,
    /// Bulletin body.
    pub body: String,
    /// Identity of the submitter.
    pub submitter: String,
    /// Optional associated astronomical event.
    pub event_id: Option<String>,
}

/// Content validation failures for circular submissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircularValidationError {
    /// The subject was empty or whitespace.
    #[error("subject must not be empty")]
    EmptySubject,

    /// The subject contained a line break.
    #[error("subject must be a single line")]
    MultilineSubject,

    /// The subject exceeded [`MAX_SUBJECT_LENGTH`] characters.
    #[error("subject must not exceed {MAX_SUBJECT_LENGTH} characters")]
    SubjectTooLong,

    /// The body was empty or whitespace.
    #[error("body must not be empty")]
    EmptyBody,
}

impl CircularSubmission {
    /// Validates subject and body content.
    ///
    /// # Errors
    ///
    /// Returns the first [`CircularValidationError`] encountered.
    pub fn validate(&self) -> Result<(), CircularValidationError> {
        if self.subject.trim().is_empty() {
            return Err(CircularValidationError::EmptySubject);
        }
        if self.subject.contains(['\n', '\r']) {
            return Err(CircularValidationError::MultilineSubject);
        }
        if self.subject.chars().count() > MAX_SUBJECT_LENGTH {
            return Err(CircularValidationError::SubjectTooLong);
        }
        if self.body.trim().is_empty() {
            return Err(CircularValidationError::EmptyBody);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> CircularSubmission {
        CircularSubmission {
            subject: "GRB 240101A: Swift detection".to_string(),
            body: "Swift-BAT triggered on GRB 240101A.".to_string(),
            submitter: "observer@example.edu".to_string(),
            event_id: Some("GRB 240101A".to_string()),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert_eq!(submission().validate(), Ok(()));
    }

    #[test]
    fn empty_subject_rejected() {
        let mut s = submission();
        s.subject = "   ".to_string();
        assert_eq!(s.validate(), Err(CircularValidationError::EmptySubject));
    }

    #[test]
    fn multiline_subject_rejected() {
        let mut s = submission();
        s.subject = "line one\nline two".to_string();
        assert_eq!(s.validate(), Err(CircularValidationError::MultilineSubject));
    }

    #[test]
    fn oversized_subject_rejected() {
        let mut s = submission();
        s.subject = "x".repeat(MAX_SUBJECT_LENGTH + 1);
        assert_eq!(s.validate(), Err(CircularValidationError::SubjectTooLong));
    }

    #[test]
    fn empty_body_rejected() {
        let mut s = submission();
        s.body = String::new();
        assert_eq!(s.validate(), Err(CircularValidationError::EmptyBody));
    }
}
