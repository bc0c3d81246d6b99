// ABOUTME: Core data models for the vitalstore health-data client
// ABOUTME: Defines sample, window, permission, characteristic, and workout types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Data Models
//!
//! Shared representations of the data flowing between the components and the
//! platform store. Models are store-agnostic: a real device backend and the
//! in-memory synthetic store exchange exactly the same types.
//!
//! ## Core Models
//!
//! - [`HealthDataType`]: platform tag for a category of health data
//! - [`QuantitySample`]: one timestamped, quantified observation
//! - [`TimeWindow`] / [`AggregateReading`]: query window and summed result
//! - [`PermissionSet`]: immutable read-set and write-set for authorization
//! - [`CharacteristicProfile`]: largely static personal attributes
//! - [`WorkoutConfiguration`] / [`WorkoutRecord`] / [`WorkoutState`]: the
//!   workout session lifecycle

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Days, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::units;

/// Platform-defined tag for a category of health data
#[non_exhaustive]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HealthDataType {
    /// Workout records (share permission gates saving finished workouts)
    Workout,
    /// Active energy burned
    ActiveEnergyBurned,
    /// Cycling distance
    DistanceCycling,
    /// Walking and running distance
    DistanceWalkingRunning,
    /// Wheelchair push distance
    DistanceWheelchair,
    /// Heart rate
    HeartRate,
}

impl Display for HealthDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Workout => "workout",
            Self::ActiveEnergyBurned => "active_energy_burned",
            Self::DistanceCycling => "distance_cycling",
            Self::DistanceWalkingRunning => "distance_walking_running",
            Self::DistanceWheelchair => "distance_wheelchair",
            Self::HeartRate => "heart_rate",
        };
        f.write_str(name)
    }
}

/// Unit a sample quantity is expressed in
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleUnit {
    /// Energy in kilocalories
    Kilocalories,
    /// Energy in kilojoules
    Kilojoules,
    /// Distance in meters
    Meters,
    /// Heart rate in beats per minute
    CountsPerMinute,
}

/// One timestamped, quantified health-data observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    /// Stable sample identity
    pub id: Uuid,
    /// Category of health data this sample belongs to
    pub data_type: HealthDataType,
    /// Observed quantity, in `unit`
    pub value: f64,
    /// Unit of `value`
    pub unit: SampleUnit,
    /// When the observation started
    pub start: DateTime<Utc>,
    /// When the observation ended
    pub end: DateTime<Utc>,
}

impl QuantitySample {
    /// Build an energy sample covering `start..end`
    #[must_use]
    pub fn energy(value: f64, unit: SampleUnit, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            data_type: HealthDataType::ActiveEnergyBurned,
            value,
            unit,
            start,
            end,
        }
    }

    /// Quantity converted to kilocalories, or `None` for non-energy units
    #[must_use]
    pub fn energy_kilocalories(&self) -> Option<f64> {
        match self.unit {
            SampleUnit::Kilocalories => Some(self.value),
            SampleUnit::Kilojoules => Some(self.value / units::KILOJOULES_PER_KILOCALORIE),
            SampleUnit::Meters | SampleUnit::CountsPerMinute => None,
        }
    }
}

/// Half-open time interval `[start, end)` used by sample queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start of the window
    pub start: DateTime<Utc>,
    /// Exclusive end of the window
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering the full previous calendar day in local time.
    ///
    /// Start is the local midnight of the day containing `reference − 24h`;
    /// end is the following local midnight.
    #[must_use]
    pub fn previous_day(reference: DateTime<Local>) -> Self {
        let day = (reference - Duration::days(1)).date_naive();
        let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
        Self {
            start: local_midnight(day),
            end: local_midnight(next),
        }
    }

    /// Whether `instant` falls inside the window
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Local midnight of `day`, folded to UTC.
///
/// When the zone skips or repeats midnight the earliest valid interpretation
/// is used; a zone without any mapping falls back to UTC midnight.
fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    match naive.and_local_timezone(Local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

/// A summed quantity and the window it was computed over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateReading {
    /// Sum of sample quantities, in kilocalories
    pub kilocalories: f64,
    /// Window the sum was computed over
    pub window: TimeWindow,
}

impl AggregateReading {
    /// Zero reading over the previous calendar day
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kilocalories: 0.0,
            window: TimeWindow::previous_day(Local::now()),
        }
    }
}

/// Immutable read-set and write-set of data types for one authorization request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Types the application asks to write
    pub write: BTreeSet<HealthDataType>,
    /// Types the application asks to read
    pub read: BTreeSet<HealthDataType>,
}

impl PermissionSet {
    /// Build a permission set from explicit write and read collections
    #[must_use]
    pub fn new(
        write: impl IntoIterator<Item = HealthDataType>,
        read: impl IntoIterator<Item = HealthDataType>,
    ) -> Self {
        Self {
            write: write.into_iter().collect(),
            read: read.into_iter().collect(),
        }
    }

    /// Whether both sets are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write.is_empty() && self.read.is_empty()
    }
}

/// Biological sex characteristic
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    /// Not recorded in the store
    NotSet,
    /// Female
    Female,
    /// Male
    Male,
    /// Other
    Other,
}

/// Blood type characteristic
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodType {
    /// Not recorded in the store
    NotSet,
    /// A positive
    APositive,
    /// A negative
    ANegative,
    /// B positive
    BPositive,
    /// B negative
    BNegative,
    /// AB positive
    AbPositive,
    /// AB negative
    AbNegative,
    /// O positive
    OPositive,
    /// O negative
    ONegative,
}

/// Largely static personal attributes, populated field-by-field.
///
/// Fields stay `None` until a read succeeds; a later failed read of one field
/// leaves that field's previous value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicProfile {
    /// Biological sex, if ever read successfully
    pub biological_sex: Option<BiologicalSex>,
    /// Age in whole years derived from date of birth
    pub age_years: Option<i32>,
    /// Blood type, if ever read successfully
    pub blood_type: Option<BloodType>,
}

/// Exercise activity recorded by a workout session
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutActivityType {
    /// Running
    Running,
    /// Cycling
    Cycling,
    /// Walking
    Walking,
    /// Swimming
    Swimming,
}

impl Display for WorkoutActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Walking => "walking",
            Self::Swimming => "swimming",
        };
        f.write_str(name)
    }
}

/// Where a workout session takes place
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLocation {
    /// Location not known
    Unknown,
    /// Indoor session
    Indoor,
    /// Outdoor session
    Outdoor,
}

/// Configuration a workout session is constructed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConfiguration {
    /// Activity being recorded
    pub activity: WorkoutActivityType,
    /// Session location
    pub location: SessionLocation,
}

impl Default for WorkoutConfiguration {
    fn default() -> Self {
        Self {
            activity: WorkoutActivityType::Running,
            location: SessionLocation::Outdoor,
        }
    }
}

/// Finalized workout persisted by the store when a session ends cleanly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Stable record identity
    pub id: Uuid,
    /// Activity that was recorded
    pub activity: WorkoutActivityType,
    /// Session location
    pub location: SessionLocation,
    /// When the session started collecting
    pub started_at: DateTime<Utc>,
    /// When the session stopped collecting
    pub ended_at: DateTime<Utc>,
    /// Active energy accumulated over the session, in kilocalories
    pub total_active_energy_kcal: f64,
}

/// Lifecycle state of the workout session controller.
///
/// `Starting` is the transient between a `start()` call and the asynchronous
/// begin-collection completion; naming it keeps the handle invariant
/// (`has_live_handles`) decidable from the state alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutState {
    /// No session exists
    Idle,
    /// Session constructed, begin-collection completion pending
    Starting,
    /// Session running and collecting
    Active,
    /// Session paused
    Paused,
    /// Two-phase shutdown in progress
    Ending,
    /// Session finished and finalized
    Ended,
    /// Session failed during start or shutdown
    Failed,
}

impl WorkoutState {
    /// Whether the session and builder handles exist in this state
    #[must_use]
    pub fn has_live_handles(self) -> bool {
        matches!(self, Self::Starting | Self::Active | Self::Paused | Self::Ending)
    }

    /// Whether `end()` is a valid transition from this state
    #[must_use]
    pub fn can_end(self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }
}

impl Display for WorkoutState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Ending => "ending",
            Self::Ended => "ended",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
            .expect("valid local datetime")
    }

    #[test]
    fn previous_day_window_covers_yesterday() {
        let reference = local(2025, 6, 15, 9);
        let window = TimeWindow::previous_day(reference);

        let start_local = window.start.with_timezone(&Local);
        assert_eq!(start_local.date_naive().day(), 14);
        assert_eq!(start_local.time(), NaiveTime::MIN);
        assert!(window.start < window.end);
        assert!(!window.contains(reference.with_timezone(&Utc)));
    }

    #[test]
    fn window_is_half_open() {
        let reference = local(2025, 3, 2, 12);
        let window = TimeWindow::previous_day(reference);
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn kilojoules_convert_to_kilocalories() {
        let now = Utc::now();
        let sample = QuantitySample::energy(41.84, SampleUnit::Kilojoules, now, now);
        let kcal = sample.energy_kilocalories().expect("energy unit");
        assert!((kcal - 10.0).abs() < 1e-9);
    }

    #[test]
    fn non_energy_units_do_not_convert() {
        let now = Utc::now();
        let sample = QuantitySample {
            id: Uuid::new_v4(),
            data_type: HealthDataType::HeartRate,
            value: 72.0,
            unit: SampleUnit::CountsPerMinute,
            start: now,
            end: now,
        };
        assert!(sample.energy_kilocalories().is_none());
    }

    #[test]
    fn handle_invariant_follows_state() {
        assert!(!WorkoutState::Idle.has_live_handles());
        assert!(WorkoutState::Starting.has_live_handles());
        assert!(WorkoutState::Active.has_live_handles());
        assert!(WorkoutState::Paused.has_live_handles());
        assert!(WorkoutState::Ending.has_live_handles());
        assert!(!WorkoutState::Ended.has_live_handles());
        assert!(!WorkoutState::Failed.has_live_handles());
    }

    #[test]
    fn end_is_valid_from_active_and_paused_only() {
        for state in [
            WorkoutState::Idle,
            WorkoutState::Starting,
            WorkoutState::Ending,
            WorkoutState::Ended,
            WorkoutState::Failed,
        ] {
            assert!(!state.can_end(), "{state} should not allow end()");
        }
        assert!(WorkoutState::Active.can_end());
        assert!(WorkoutState::Paused.can_end());
    }
}
