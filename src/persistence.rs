//! Durable storage of the workout list in a single named key-value slot.
//!
//! The slot holds a JSON array of flat records:
//! `{id, type, coords:[lat,lng], distance, duration, date, clicks, cadence?, elevation?}`.
//! Derived values are never read back; they are recomputed on load.

use crate::dlog;
use crate::error::Error;
use crate::factory::{self, WorkoutInput};
use crate::workout::{Extra, Workout, WorkoutKind};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Slot name used by earlier releases; kept for compatibility.
pub const DEFAULT_SLOT: &str = "workout";

/// A string key-value store in the shape of browser local storage.
pub trait SlotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Open (creating if needed) a slot directory.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data dir: {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            anyhow::bail!("Refusing to use unsafe slot name: {key:?}");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStore for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading slot: {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write beside the target and rename so a crash never leaves a torn slot.
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temp file in {}", self.dir.display()))?;
        tmp.write_all(value.as_bytes())
            .context("writing slot contents")?;
        tmp.persist(&path)
            .with_context(|| format!("replacing slot: {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing slot: {}", path.display())),
        }
    }
}

/// Persisted shape of one workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub coords: [f64; 2],
    pub distance: f64,
    pub duration: f64,
    pub date: String,
    #[serde(default)]
    pub clicks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        let (cadence, elevation) = match w.extra() {
            Extra::Cadence(c) => (Some(f64::from(c)), None),
            Extra::Elevation(e) => (None, Some(e)),
        };
        Self {
            id: w.id().to_string(),
            kind: w.kind(),
            coords: w.coords().into(),
            distance: w.distance(),
            duration: w.duration(),
            date: w.date().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            clicks: w.clicks(),
            cadence,
            elevation,
        }
    }
}

impl WorkoutRecord {
    /// Rebuild the typed workout, recomputing derived fields.
    ///
    /// The persisted id replaces a freshly generated one.
    pub fn into_workout(self) -> Result<Workout> {
        let date = parse_date(&self.date)
            .with_context(|| format!("bad date {:?} on workout {}", self.date, self.id))?;
        let extra = match self.kind {
            WorkoutKind::Running => self.cadence,
            WorkoutKind::Cycling => self.elevation,
        }
        .with_context(|| format!("workout {} is missing its {} field", self.id, self.kind))?;
        let input = WorkoutInput {
            kind: self.kind,
            distance: self.distance,
            duration: self.duration,
            extra,
        };
        let clicks = self.clicks;
        let w = factory::rebuild(self.id, self.coords.into(), &input, date)?;
        Ok(w.with_clicks(clicks))
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (taken as UTC midnight).
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d").context("unrecognised date format")?;
    Ok(day.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Serialize workouts into slot contents.
pub fn encode(workouts: &[Workout]) -> Result<String> {
    let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
    serde_json::to_string(&records).context("serializing workouts")
}

/// Parse slot contents, skipping records that cannot be rebuilt.
///
/// Fails only when the blob as a whole is not a JSON array.
pub fn decode(blob: &str) -> crate::error::Result<Vec<Workout>> {
    let values: Vec<JsonValue> =
        serde_json::from_str(blob).map_err(|e| Error::PersistenceParse(e.to_string()))?;
    let mut out = Vec::with_capacity(values.len());

    for (idx, value) in values.into_iter().enumerate() {
        let kind = value.get("type").and_then(JsonValue::as_str).unwrap_or("");
        if kind.parse::<WorkoutKind>().is_err() {
            tracing::warn!(idx, kind, "skipping persisted workout with unknown type");
            continue;
        }

        let record: WorkoutRecord = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(idx, err = %e, "skipping malformed workout record");
                continue;
            }
        };

        match record.into_workout() {
            Ok(w) => out.push(w),
            Err(e) => tracing::warn!(idx, err = %e, "skipping invalid workout record"),
        }
    }

    Ok(out)
}

/// Saves and restores the workout list through one named slot.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    slots: S,
    key: String,
}

impl<S: SlotStore> Persistence<S> {
    pub fn new(slots: S) -> Self {
        Self::with_key(slots, DEFAULT_SLOT)
    }

    pub fn with_key(slots: S, key: &str) -> Self {
        Self {
            slots,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn slots(&self) -> &S {
        &self.slots
    }

    /// Overwrite the slot with the full sequence.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let blob = encode(workouts)?;
        self.slots.set(&self.key, &blob)?;
        dlog!("saved slot={} workouts={}", self.key, workouts.len());
        Ok(())
    }

    /// Read the slot back. Absent, unreadable or unparseable data yields an
    /// empty list.
    pub fn load(&self) -> Vec<Workout> {
        let blob = match self.slots.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                dlog!("slot={} is empty", self.key);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(slot = %self.key, err = %e, "could not read workouts; starting empty");
                return Vec::new();
            }
        };

        match decode(&blob) {
            Ok(workouts) => {
                dlog!("loaded slot={} workouts={}", self.key, workouts.len());
                workouts
            }
            Err(e) => {
                tracing::warn!(slot = %self.key, err = %e, "persisted workouts are unparseable; starting empty");
                Vec::new()
            }
        }
    }

    /// Remove the slot entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.slots.remove(&self.key)?;
        tracing::info!(slot = %self.key, "cleared stored workouts");
        Ok(())
    }
}
