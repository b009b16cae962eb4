//! Error types shared by the workout core.

use crate::workout::WorkoutKind;
use std::fmt;

/// Why a single input field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NotFinite,
    NotPositive,
    NotWholeNumber,
    OutOfRange,
    Unknown,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFinite => "must be a number",
            Self::NotPositive => "must be positive",
            Self::NotWholeNumber => "must be a whole number",
            Self::OutOfRange => "is out of range",
            Self::Unknown => "is not recognised",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub reason: Reason,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// User-correctable input problem. No workout is constructed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.kind, .issues))]
pub struct ValidationError {
    /// `None` when the workout type itself could not be recognised.
    pub kind: Option<WorkoutKind>,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Names of the offending fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.field).collect()
    }

    pub fn names(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn render(kind: &Option<WorkoutKind>, issues: &[FieldIssue]) -> String {
    match kind {
        Some(k) => format!(
            "{} inputs have to be positive numbers: {}",
            k.label(),
            join_issues(issues)
        ),
        None => format!("Unrecognised workout: {}", join_issues(issues)),
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raised by entity construction when a source field breaks a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {reason}")]
pub struct DomainError {
    pub field: &'static str,
    pub reason: Reason,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid workout: {0}")]
    Domain(#[from] DomainError),

    #[error("workout id already present in store: {0}")]
    DuplicateId(String),

    #[error("workout not found: {0}")]
    NotFound(String),

    #[error("could not parse persisted workouts: {0}")]
    PersistenceParse(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl Error {
    /// Recoverable conditions the caller should report and move on from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::PersistenceParse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let err = ValidationError {
            kind: Some(WorkoutKind::Running),
            issues: vec![
                FieldIssue {
                    field: "distance",
                    reason: Reason::NotPositive,
                },
                FieldIssue {
                    field: "cadence",
                    reason: Reason::NotFinite,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Running inputs have to be positive numbers: distance must be positive, cadence must be a number"
        );
        assert_eq!(err.fields(), vec!["distance", "cadence"]);
        assert!(err.names("cadence"));
        assert!(!err.names("duration"));
    }

    #[test]
    fn unknown_type_message_does_not_mention_numbers() {
        let err = ValidationError {
            kind: None,
            issues: vec![FieldIssue {
                field: "type",
                reason: Reason::Unknown,
            }],
        };
        assert_eq!(err.to_string(), "Unrecognised workout: type is not recognised");
    }

    #[test]
    fn domain_error_names_field_and_reason() {
        let err = DomainError {
            field: "lat",
            reason: Reason::OutOfRange,
        };
        assert_eq!(err.to_string(), "lat is out of range");
    }

    #[test]
    fn recoverable_classification() {
        assert!(Error::NotFound("x".into()).is_recoverable());
        assert!(!Error::DuplicateId("x".into()).is_recoverable());
        assert!(!Error::Storage(anyhow::anyhow!("disk")).is_recoverable());
    }
}
