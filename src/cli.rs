use crate::persistence::DEFAULT_SLOT;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".mapty";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts pinned to map coordinates"
)]
pub struct Cli {
    /// Directory holding the workout store.
    #[arg(long, env = "MAPTY_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: PathBuf,

    /// Storage backend for the workout slot.
    #[arg(long, env = "MAPTY_BACKEND", value_enum, default_value_t = Backend::File, global = true)]
    pub backend: Backend,

    /// Name of the storage slot holding the workout list.
    #[arg(long, default_value = DEFAULT_SLOT, global = true)]
    pub slot: String,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per slot.
    File,
    /// A single SQLite database.
    Sqlite,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a workout at a map location.
    Add {
        /// Latitude of the clicked location.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the clicked location.
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[command(flatten)]
        form: FormArgs,
    },

    /// List workouts in the order they were logged.
    List {
        /// Also print id, coordinates, date and click count.
        #[arg(long)]
        details: bool,
    },

    /// Print one workout with all its details.
    Show { id: String },

    /// Select a workout: print it and count the click.
    Click { id: String },

    /// Remove a workout.
    Remove { id: String },

    /// Replace a workout's numbers, keeping its id, location and date.
    Edit {
        id: String,

        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete every stored workout.
    Reset,

    /// Write all workouts as GPX waypoints.
    ExportGpx { path: PathBuf },
}

/// Raw form fields; validated by the workout factory, not by the parser.
#[derive(Args, Debug, Clone)]
pub struct FormArgs {
    /// `running` or `cycling`.
    #[arg(value_name = "TYPE")]
    pub kind: String,

    /// Distance in km.
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    pub distance: String,

    /// Duration in minutes.
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    pub duration: String,

    /// Steps per minute (running).
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    pub cadence: String,

    /// Elevation gain in meters (cycling).
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    pub elevation: String,
}
