//! The workout entity: one recorded exercise session pinned to a map location.
//!
//! Derived values (`pace`, `speed`, `description`) are computed once when the
//! entity is built and cannot be set independently. After construction the only
//! mutable field is the click counter.

use crate::error::{DomainError, FieldIssue, Reason};
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Discriminant as persisted in the `type` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    /// Capitalised form used in descriptions.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            other => Err(format!("unknown workout type: {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Axes that are not finite or fall outside ±90 / ±180 degrees, lat first.
    pub fn issues(self) -> Vec<FieldIssue> {
        [("lat", self.lat, 90.0), ("lng", self.lng, 180.0)]
            .into_iter()
            .filter_map(|(field, v, limit)| {
                let reason = if !v.is_finite() {
                    Reason::NotFinite
                } else if v.abs() > limit {
                    Reason::OutOfRange
                } else {
                    return None;
                };
                Some(FieldIssue { field, reason })
            })
            .collect()
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

/// The type-specific source field a variant is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extra {
    /// Steps per minute.
    Cadence(u32),
    /// Elevation gain in meters. May be zero or negative.
    Elevation(f64),
}

impl Extra {
    pub const fn kind(self) -> WorkoutKind {
        match self {
            Self::Cadence(_) => WorkoutKind::Running,
            Self::Elevation(_) => WorkoutKind::Cycling,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Metrics {
    Running { cadence: u32, pace: f64 },
    Cycling { elevation: f64, speed: f64 },
}

impl Metrics {
    fn compute(extra: Extra, distance: f64, duration: f64) -> Self {
        match extra {
            Extra::Cadence(cadence) => Self::Running {
                cadence,
                pace: duration / distance,
            },
            Extra::Elevation(elevation) => Self::Cycling {
                elevation,
                speed: distance / (duration / 60.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    coords: Coords,
    distance: f64,
    duration: f64,
    date: DateTime<Utc>,
    clicks: u32,
    description: String,
    metrics: Metrics,
}

impl Workout {
    /// Build a workout, computing its derived metric and description.
    ///
    /// `distance` is in kilometers, `duration` in minutes; both must be finite
    /// and strictly positive, as must a running cadence. Coordinates and
    /// elevation must be finite so the workout survives a save and reload.
    pub fn new(
        id: String,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: Extra,
        date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if let Some(FieldIssue { field, reason }) = coords.issues().into_iter().next() {
            return Err(DomainError { field, reason });
        }
        ensure_positive("distance", distance)?;
        ensure_positive("duration", duration)?;
        match extra {
            Extra::Cadence(0) => {
                return Err(DomainError {
                    field: "cadence",
                    reason: Reason::NotPositive,
                });
            }
            Extra::Elevation(e) if !e.is_finite() => {
                return Err(DomainError {
                    field: "elevation",
                    reason: Reason::NotFinite,
                });
            }
            _ => {}
        }

        let kind = extra.kind();
        Ok(Self {
            id,
            coords,
            distance,
            duration,
            date,
            clicks: 0,
            description: describe(kind, date),
            metrics: Metrics::compute(extra, distance, duration),
        })
    }

    pub fn running(
        id: String,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: u32,
        date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::new(id, coords, distance, duration, Extra::Cadence(cadence), date)
    }

    pub fn cycling(
        id: String,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation: f64,
        date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::new(id, coords, distance, duration, Extra::Elevation(elevation), date)
    }

    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    /// Restores a persisted click count.
    pub(crate) fn with_clicks(mut self, clicks: u32) -> Self {
        self.clicks = clicks;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self.metrics {
            Metrics::Running { .. } => WorkoutKind::Running,
            Metrics::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub const fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub const fn extra(&self) -> Extra {
        match self.metrics {
            Metrics::Running { cadence, .. } => Extra::Cadence(cadence),
            Metrics::Cycling { elevation, .. } => Extra::Elevation(elevation),
        }
    }

    /// Minutes per kilometer, for running workouts.
    pub const fn pace(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Running { pace, .. } => Some(pace),
            Metrics::Cycling { .. } => None,
        }
    }

    /// Kilometers per hour, for cycling workouts.
    pub const fn speed(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Cycling { speed, .. } => Some(speed),
            Metrics::Running { .. } => None,
        }
    }

    pub const fn cadence(&self) -> Option<u32> {
        match self.metrics {
            Metrics::Running { cadence, .. } => Some(cadence),
            Metrics::Cycling { .. } => None,
        }
    }

    pub const fn elevation(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Cycling { elevation, .. } => Some(elevation),
            Metrics::Running { .. } => None,
        }
    }
}

fn ensure_positive(field: &'static str, v: f64) -> Result<(), DomainError> {
    let reason = if !v.is_finite() {
        Reason::NotFinite
    } else if v <= 0.0 {
        Reason::NotPositive
    } else {
        return Ok(());
    };
    Err(DomainError { field, reason })
}

/// e.g. "Running on April 14", on the user's local calendar.
fn describe(kind: WorkoutKind, date: DateTime<Utc>) -> String {
    describe_in(kind, &date.with_timezone(&Local))
}

fn describe_in<Tz: TimeZone>(kind: WorkoutKind, date: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("{} on {} {}", kind.label(), date.format("%B"), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn april_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap()
    }

    fn local_label(kind: WorkoutKind, date: DateTime<Utc>) -> String {
        let local = date.with_timezone(&Local);
        format!("{} on {} {}", kind.label(), local.format("%B"), local.day())
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::running("a".into(), Coords::new(1.0, 2.0), 5.2, 24.0, 178, april_14())
            .unwrap();
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.pace(), Some(24.0 / 5.2));
        assert_eq!(w.speed(), None);
        assert_eq!(w.cadence(), Some(178));
        assert_eq!(w.describe(), local_label(WorkoutKind::Running, april_14()));
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = Workout::cycling("b".into(), Coords::new(1.0, 2.0), 27.0, 95.0, -523.0, april_14())
            .unwrap();
        assert_eq!(w.kind(), WorkoutKind::Cycling);
        assert_eq!(w.speed(), Some(27.0 / (95.0 / 60.0)));
        assert_eq!(w.elevation(), Some(-523.0));
        assert_eq!(w.describe(), local_label(WorkoutKind::Cycling, april_14()));
    }

    #[test]
    fn description_follows_local_calendar_day() {
        let late_evening_in_new_york = Utc.with_ymd_and_hms(2024, 4, 15, 2, 0, 0).unwrap();
        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();
        assert_eq!(
            describe_in(
                WorkoutKind::Running,
                &late_evening_in_new_york.with_timezone(&new_york)
            ),
            "Running on April 14"
        );
        assert_eq!(
            describe_in(WorkoutKind::Running, &late_evening_in_new_york),
            "Running on April 15"
        );
    }

    #[test]
    fn rejects_non_finite_or_out_of_range_coords() {
        for (coords, field, reason) in [
            (Coords::new(f64::NAN, 2.0), "lat", Reason::NotFinite),
            (Coords::new(1.0, f64::INFINITY), "lng", Reason::NotFinite),
            (Coords::new(90.5, 2.0), "lat", Reason::OutOfRange),
            (Coords::new(1.0, -180.5), "lng", Reason::OutOfRange),
        ] {
            let err = Workout::running("a".into(), coords, 5.0, 30.0, 180, april_14()).unwrap_err();
            assert_eq!((err.field, err.reason), (field, reason));
        }
        assert!(Coords::new(-90.0, 180.0).issues().is_empty());
    }

    #[test]
    fn rejects_non_finite_elevation() {
        let c = Coords::new(1.0, 2.0);
        for e in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Workout::cycling("b".into(), c, 10.0, 30.0, e, april_14()).unwrap_err();
            assert_eq!((err.field, err.reason), ("elevation", Reason::NotFinite));
        }
    }

    #[test]
    fn rejects_non_positive_source_fields() {
        let c = Coords::new(0.0, 0.0);
        let err = Workout::running("a".into(), c, 0.0, 10.0, 170, april_14()).unwrap_err();
        assert_eq!(err.field, "distance");
        let err = Workout::cycling("a".into(), c, 3.0, -1.0, 0.0, april_14()).unwrap_err();
        assert_eq!(err.field, "duration");
        let err = Workout::running("a".into(), c, 3.0, 10.0, 0, april_14()).unwrap_err();
        assert_eq!(err.field, "cadence");
        let err = Workout::running("a".into(), c, f64::INFINITY, 10.0, 1, april_14()).unwrap_err();
        assert_eq!(err.field, "distance");
    }

    #[test]
    fn click_only_touches_counter() {
        let mut w =
            Workout::running("a".into(), Coords::new(1.0, 2.0), 5.0, 30.0, 180, april_14()).unwrap();
        let before = w.clone();
        w.click();
        w.click();
        assert_eq!(w.clicks(), 2);
        assert_eq!(w.clone().with_clicks(0), before);
    }

    #[test]
    fn kind_parses_from_persisted_tag() {
        assert_eq!("running".parse::<WorkoutKind>(), Ok(WorkoutKind::Running));
        assert_eq!("cycling".parse::<WorkoutKind>(), Ok(WorkoutKind::Cycling));
        assert!("swimming".parse::<WorkoutKind>().is_err());
        assert_eq!(WorkoutKind::Cycling.to_string(), "cycling");
    }
}
