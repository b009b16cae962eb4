//! Validates raw workout input and builds the matching workout variant.

use crate::error::{DomainError, FieldIssue, Reason, ValidationError};
use crate::id::IdGenerator;
use crate::workout::{Coords, Extra, Workout, WorkoutKind};
use chrono::{DateTime, Utc};

/// Numeric fields as entered, before validation.
///
/// `extra` is the cadence for running and the elevation gain for cycling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    pub extra: f64,
}

impl WorkoutInput {
    pub const fn running(distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance,
            duration,
            extra: cadence,
        }
    }

    pub const fn cycling(distance: f64, duration: f64, elevation: f64) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance,
            duration,
            extra: elevation,
        }
    }

    /// Build input from text form fields. Only the field matching `kind` of
    /// cadence/elevation is read.
    pub fn from_form(
        kind: &str,
        distance: &str,
        duration: &str,
        cadence: &str,
        elevation: &str,
    ) -> Result<Self, ValidationError> {
        let kind: WorkoutKind = kind.trim().parse().map_err(|_| ValidationError {
            kind: None,
            issues: vec![FieldIssue {
                field: "type",
                reason: Reason::Unknown,
            }],
        })?;
        let extra = match kind {
            WorkoutKind::Running => cadence,
            WorkoutKind::Cycling => elevation,
        };
        Ok(Self {
            kind,
            distance: parse_field(distance),
            duration: parse_field(duration),
            extra: parse_field(extra),
        })
    }

    /// Input that reproduces an existing workout's source fields.
    pub fn of(w: &Workout) -> Self {
        let extra = match w.extra() {
            Extra::Cadence(c) => f64::from(c),
            Extra::Elevation(e) => e,
        };
        Self {
            kind: w.kind(),
            distance: w.distance(),
            duration: w.duration(),
            extra,
        }
    }
}

/// Coerce a text field to a number the way a numeric form input does:
/// blank is zero, anything unparseable is NaN.
pub fn parse_field(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse().unwrap_or(f64::NAN)
}

/// Check every field and return the variant-specific source value.
///
/// All offending fields are reported together.
pub fn validate(coords: Coords, input: &WorkoutInput) -> Result<Extra, ValidationError> {
    let mut issues = coords.issues();
    check_positive(&mut issues, "distance", input.distance);
    check_positive(&mut issues, "duration", input.duration);

    let extra = match input.kind {
        WorkoutKind::Running => {
            let before = issues.len();
            check_positive(&mut issues, "cadence", input.extra);
            if issues.len() == before
                && (input.extra.fract() != 0.0 || input.extra > f64::from(u32::MAX))
            {
                issues.push(FieldIssue {
                    field: "cadence",
                    reason: Reason::NotWholeNumber,
                });
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let cadence = input.extra as u32;
            Extra::Cadence(cadence)
        }
        WorkoutKind::Cycling => {
            if !input.extra.is_finite() {
                issues.push(FieldIssue {
                    field: "elevation",
                    reason: Reason::NotFinite,
                });
            }
            Extra::Elevation(input.extra)
        }
    };

    if issues.is_empty() {
        Ok(extra)
    } else {
        Err(ValidationError {
            kind: Some(input.kind),
            issues,
        })
    }
}

fn check_positive(issues: &mut Vec<FieldIssue>, field: &'static str, v: f64) {
    let reason = if !v.is_finite() {
        Reason::NotFinite
    } else if v <= 0.0 {
        Reason::NotPositive
    } else {
        return;
    };
    issues.push(FieldIssue { field, reason });
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutFactory<G> {
    ids: G,
}

impl<G: IdGenerator> WorkoutFactory<G> {
    pub const fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Validate and build a workout dated now with a fresh id.
    pub fn create(
        &mut self,
        coords: Coords,
        input: &WorkoutInput,
    ) -> Result<Workout, ValidationError> {
        self.create_at(coords, input, Utc::now())
    }

    pub fn create_at(
        &mut self,
        coords: Coords,
        input: &WorkoutInput,
        date: DateTime<Utc>,
    ) -> Result<Workout, ValidationError> {
        let extra = validate(coords, input)?;
        let id = self.ids.generate();
        build(id, coords, input, extra, date)
    }
}

/// Build a workout under an existing id, as when reconstructing from storage
/// or applying an edit. No id is drawn from a generator.
pub fn rebuild(
    id: String,
    coords: Coords,
    input: &WorkoutInput,
    date: DateTime<Utc>,
) -> Result<Workout, ValidationError> {
    let extra = validate(coords, input)?;
    build(id, coords, input, extra, date)
}

fn build(
    id: String,
    coords: Coords,
    input: &WorkoutInput,
    extra: Extra,
    date: DateTime<Utc>,
) -> Result<Workout, ValidationError> {
    Workout::new(id, coords, input.distance, input.duration, extra, date).map_err(
        |DomainError { field, reason }| ValidationError {
            kind: Some(input.kind),
            issues: vec![FieldIssue { field, reason }],
        },
    )
}
