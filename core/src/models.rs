use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// `[lat, lng]` pair, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn label(self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

// Process-wide sequence folded into ids so two workouts created within the
// same millisecond still come out distinct.
static ID_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_id(created_at: DateTime<Utc>) -> String {
    let seq = ID_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}{:03}", created_at.timestamp_millis(), seq % 1000)
}

/// "Running on April 5" — month name and unpadded day from the creation time.
fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), created_at.format("%B %-d"))
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}

/// A running workout. Pace (min/km) is derived once at construction and
/// persisted verbatim; it is never recomputed after a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Running {
    id: String,
    created_at: DateTime<Utc>,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    cadence_spm: f64,
    pace_min_per_km: f64,
}

impl Running {
    pub fn new(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self, ValidationError> {
        let distance_km = positive("distance", distance_km)?;
        let duration_min = positive("duration", duration_min)?;
        let cadence_spm = positive("cadence", cadence_spm)?;

        let created_at = Utc::now();
        Ok(Self {
            id: next_id(created_at),
            created_at,
            coordinates,
            distance_km,
            duration_min,
            description: describe(WorkoutKind::Running, created_at),
            cadence_spm,
            pace_min_per_km: duration_min / distance_km,
        })
    }

    pub fn cadence_spm(&self) -> f64 {
        self.cadence_spm
    }

    pub fn pace_min_per_km(&self) -> f64 {
        self.pace_min_per_km
    }
}

/// A cycling workout. Speed (km/h) is derived once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycling {
    id: String,
    created_at: DateTime<Utc>,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    elevation_gain_m: f64,
    speed_km_per_h: f64,
}

impl Cycling {
    pub fn new(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, ValidationError> {
        let distance_km = positive("distance", distance_km)?;
        let duration_min = positive("duration", duration_min)?;
        let elevation_gain_m = non_negative("elevation", elevation_gain_m)?;

        let created_at = Utc::now();
        Ok(Self {
            id: next_id(created_at),
            created_at,
            coordinates,
            distance_km,
            duration_min,
            description: describe(WorkoutKind::Cycling, created_at),
            elevation_gain_m,
            speed_km_per_h: distance_km / (duration_min / 60.0),
        })
    }

    pub fn elevation_gain_m(&self) -> f64 {
        self.elevation_gain_m
    }

    pub fn speed_km_per_h(&self) -> f64 {
        self.speed_km_per_h
    }
}

/// Tagged union over the two workout variants. The serialized form is flat
/// with a lowercase `type` discriminator, so a stored record looks like
/// `{ "type": "running", "id": ..., "coordinates": [lat, lng], ... }` and
/// loading reconstructs the proper variant from the tag alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Workout {
    Running(Running),
    Cycling(Cycling),
}

impl Workout {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Workout::Running(_) => WorkoutKind::Running,
            Workout::Cycling(_) => WorkoutKind::Cycling,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Workout::Running(w) => &w.id,
            Workout::Cycling(w) => &w.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Workout::Running(w) => w.created_at,
            Workout::Cycling(w) => w.created_at,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        match self {
            Workout::Running(w) => w.coordinates,
            Workout::Cycling(w) => w.coordinates,
        }
    }

    pub fn distance_km(&self) -> f64 {
        match self {
            Workout::Running(w) => w.distance_km,
            Workout::Cycling(w) => w.distance_km,
        }
    }

    pub fn duration_min(&self) -> f64 {
        match self {
            Workout::Running(w) => w.duration_min,
            Workout::Cycling(w) => w.duration_min,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Workout::Running(w) => &w.description,
            Workout::Cycling(w) => &w.description,
        }
    }

    /// Map popup content, e.g. "🏃‍♂️ Running on April 5".
    pub fn marker_label(&self) -> String {
        format!("{} {}", self.kind().emoji(), self.description())
    }
}

impl From<Running> for Workout {
    fn from(w: Running) -> Self {
        Workout::Running(w)
    }
}

impl From<Cycling> for Workout {
    fn from(w: Cycling) -> Self {
        Workout::Cycling(w)
    }
}
