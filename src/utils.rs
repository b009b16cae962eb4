use crate::workout::{Metrics, Workout, WorkoutKind};
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// Initialize colorful logging.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = level_for(verbose, quiet);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mapty={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

fn level_for(verbose: u8, quiet: u8) -> &'static str {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    }
}

pub const fn workout_icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

/// One-line rendering of a workout's numbers, as shown in the list.
///
/// e.g. `5 km | 30 min | 6.0 min/km | 180 spm`
pub fn format_summary(w: &Workout) -> String {
    let tail = match *w.metrics() {
        Metrics::Running { cadence, pace } => format!("{pace:.1} min/km | {cadence} spm"),
        Metrics::Cycling { elevation, speed } => format!("{speed:.1} km/h | {elevation} m"),
    };
    format!("{} km | {} min | {tail}", w.distance(), w.duration())
}

/// Marker popup text, e.g. `🏃‍♂️ Running on April 14`.
pub fn popup_label(w: &Workout) -> String {
    format!("{} {}", workout_icon(w.kind()), w.describe())
}
