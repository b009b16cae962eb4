//! End-to-end input handling: raw form text in, workouts or validation errors out.

use chrono::{Datelike, Local};
use mapty::error::Error;
use mapty::factory::WorkoutInput;
use mapty::id::UuidGenerator;
use mapty::persistence::{MemorySlots, Persistence};
use mapty::session::Session;
use mapty::workout::{Coords, WorkoutKind};

fn session() -> Session<MemorySlots, UuidGenerator> {
    Session::open(Persistence::new(MemorySlots::new()), UuidGenerator)
}

#[test]
fn running_form_submission() {
    let mut s = session();
    let input = WorkoutInput::from_form("running", "5", "30", "180", "").unwrap();
    let w = s.log_workout(Coords::new(40.7, -74.0), &input).unwrap();

    assert_eq!(w.kind(), WorkoutKind::Running);
    assert_eq!(w.pace(), Some(6.0));
    let local = w.date().with_timezone(&Local);
    assert_eq!(
        w.describe(),
        format!("Running on {} {}", local.format("%B"), local.day())
    );
}

#[test]
fn garbage_text_is_rejected_with_field_names() {
    let mut s = session();
    let input = WorkoutInput::from_form("running", "five", "30", "", "").unwrap();
    let err = s.log_workout(Coords::new(0.0, 0.0), &input).unwrap_err();
    let v = match err {
        Error::Validation(v) => v,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(v.fields(), vec!["distance", "cadence"]);
    assert!(v.to_string().starts_with("Running inputs have to be positive numbers"));
    assert!(s.workouts().is_empty());
}

#[test]
fn cycling_accepts_downhill_rides() {
    let mut s = session();
    let input = WorkoutInput::from_form("cycling", "12", "36", "", "-300").unwrap();
    let w = s.log_workout(Coords::new(0.0, 0.0), &input).unwrap();
    assert_eq!(w.elevation(), Some(-300.0));
    assert_eq!(w.speed(), Some(20.0));
}

#[test]
fn workouts_listed_in_submission_order() {
    let mut s = session();
    let mut ids = Vec::new();
    for d in [3.0, 1.0, 2.0] {
        let w = s
            .log_workout(Coords::new(0.0, 0.0), &WorkoutInput::running(d, 10.0, 160.0))
            .unwrap();
        ids.push(w.id().to_string());
    }
    let listed: Vec<&str> = s.workouts().iter().map(|w| w.id()).collect();
    assert_eq!(listed, ids);
}

#[test]
fn off_map_locations_are_rejected() {
    let mut s = session();
    let input = WorkoutInput::from_form("running", "5", "30", "180", "").unwrap();
    for (coords, field) in [
        (Coords::new(91.0, 0.0), "lat"),
        (Coords::new(0.0, -180.01), "lng"),
        (Coords::new(f64::NAN, 0.0), "lat"),
        (Coords::new(0.0, f64::NEG_INFINITY), "lng"),
    ] {
        let err = s.log_workout(coords, &input).unwrap_err();
        assert!(matches!(&err, Error::Validation(v) if v.fields() == vec![field]));
        assert!(err.is_recoverable());
    }
    assert!(s.workouts().is_empty());
    assert!(s.log_workout(Coords::new(-90.0, 180.0), &input).is_ok());
}
