#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::cargo_common_metadata)]

use anyhow::{Context, Result};
use clap::Parser;
use mapty::cli::{self, Backend, Cmd, FormArgs};
use mapty::database::SqliteSlots;
use mapty::error::Error;
use mapty::factory::WorkoutInput;
use mapty::id::UuidGenerator;
use mapty::persistence::{FileSlots, Persistence, SlotStore};
use mapty::session::Session;
use mapty::workout::{Coords, Workout};
use mapty::{gpx, utils};

#[macro_use]
extern crate mapty;

type AppSession = Session<Box<dyn SlotStore>, UuidGenerator>;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let slots = open_slots(&cli)?;
    dlog!(
        "backend={:?} data_dir={} slot={}",
        cli.backend,
        cli.data_dir.display(),
        cli.slot
    );
    let mut session = Session::open(Persistence::with_key(slots, &cli.slot), UuidGenerator);

    match cli.cmd {
        Cmd::Add { lat, lng, form } => {
            let input = read_form(&form)?;
            let w = recover(session.log_workout(Coords::new(lat, lng), &input))?;
            if let Some(w) = w {
                print_row(w, true);
            }
        }
        Cmd::List { details } => list(&session, details),
        Cmd::Show { id } => match session.find(&id) {
            Some(w) => print_row(w, true),
            None => tracing::warn!(id = %id, "no workout with that id"),
        },
        Cmd::Click { id } => {
            if let Some(clicks) = recover(session.click(&id))? {
                if let Some(w) = session.find(&id) {
                    print_row(w, true);
                }
                dlog!("click id={id} clicks={clicks}");
            }
        }
        Cmd::Remove { id } => {
            if let Some(w) = recover(session.remove(&id))? {
                println!("removed {}", w.id());
            }
        }
        Cmd::Edit { id, form } => {
            let input = read_form(&form)?;
            if let Some(w) = recover(session.edit(&id, &input))? {
                print_row(w, true);
            }
        }
        Cmd::Reset => {
            session.reset()?;
            println!("all workouts removed");
        }
        Cmd::ExportGpx { path } => gpx::export_to_file(&path, session.workouts())?,
    }

    Ok(())
}

fn open_slots(cli: &cli::Cli) -> Result<Box<dyn SlotStore>> {
    let slots: Box<dyn SlotStore> = match cli.backend {
        Backend::File => Box::new(FileSlots::open(&cli.data_dir)?),
        Backend::Sqlite => {
            std::fs::create_dir_all(&cli.data_dir).with_context(|| {
                format!("creating data dir: {}", cli.data_dir.display())
            })?;
            Box::new(SqliteSlots::open(&cli.data_dir.join("mapty.sqlite"))?)
        }
    };
    Ok(slots)
}

fn read_form(form: &FormArgs) -> Result<WorkoutInput> {
    Ok(WorkoutInput::from_form(
        &form.kind,
        &form.distance,
        &form.duration,
        &form.cadence,
        &form.elevation,
    )?)
}

/// Missing ids are reported and skipped; everything else is an error.
fn recover<T>(res: mapty::error::Result<T>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(Error::NotFound(id)) => {
            tracing::warn!(id = %id, "no workout with that id");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn list(session: &AppSession, details: bool) {
    let workouts = session.workouts();
    if workouts.is_empty() {
        tracing::info!("no workouts yet; add one with `mapty add`");
        return;
    }
    for w in workouts {
        print_row(w, details);
    }
}

fn print_row(w: &Workout, details: bool) {
    let label = utils::popup_label(w);
    let summary = utils::format_summary(w);
    if details {
        let c = w.coords();
        println!(
            "{}\t{label}\t{summary}\t[{}, {}]\t{}\tclicks={}",
            w.id(),
            c.lat,
            c.lng,
            w.date().to_rfc3339(),
            w.clicks()
        );
    } else {
        println!("{label}\t{summary}");
    }
}
