// ABOUTME: In-memory synthetic health store for development and testing
// ABOUTME: Provides configurable samples, characteristics, and workout sessions without a device
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Synthetic Health Store
//!
//! A fully functional [`HealthStore`] that keeps everything in memory.
//! Unlike a device backend it:
//!
//! - requires no platform entitlements or user consent dialogs
//! - supports deterministic, seeded sample generation
//! - lets tests inject availability, authorization, query, and session
//!   failures at precise lifecycle phases
//!
//! ## Thread Safety
//!
//! All state sits behind an `RwLock`; lock poisoning is mapped to
//! [`StoreError::Internal`] so it propagates as an ordinary typed error.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

use crate::constants::{defaults, units};
use crate::errors::{CollectionPhase, StoreError, StoreResult};
use crate::models::{
    BiologicalSex, BloodType, HealthDataType, PermissionSet, QuantitySample, SampleUnit,
    TimeWindow, WorkoutConfiguration, WorkoutRecord, WorkoutState,
};
use crate::store::{
    HealthStore, SampleQuery, SampleSort, SessionEvent, SessionParts, WorkoutBuilderHandle,
    WorkoutSessionHandle,
};

/// Per-phase failure switches for synthetic workout sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureInjection {
    /// Fail the begin-collection completion
    pub begin_collection: bool,
    /// Fail the end-collection completion
    pub end_collection: bool,
    /// Fail the finalize step
    pub finalize: bool,
}

#[derive(Debug)]
struct Inner {
    available: bool,
    authorization_failure: Option<String>,
    authorization_requests: usize,
    authorized: Option<PermissionSet>,
    samples: Vec<QuantitySample>,
    biological_sex: Option<BiologicalSex>,
    date_of_birth: Option<NaiveDate>,
    blood_type: Option<BloodType>,
    fail_query: bool,
    failures: FailureInjection,
    begin_gate: Option<Arc<Notify>>,
    session_live: bool,
    workouts: Vec<WorkoutRecord>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            available: true,
            authorization_failure: None,
            authorization_requests: 0,
            authorized: None,
            samples: Vec::new(),
            biological_sex: None,
            date_of_birth: None,
            blood_type: None,
            fail_query: false,
            failures: FailureInjection::default(),
            begin_gate: None,
            session_live: false,
            workouts: Vec::new(),
        }
    }
}

/// In-memory health store for development, demos, and tests
pub struct SyntheticStore {
    inner: Arc<RwLock<Inner>>,
}

impl Default for SyntheticStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticStore {
    /// Create an empty, available store
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Create a store that reports health data unavailable on this device
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.write() {
            inner.available = false;
        }
        store
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StoreError::poisoned("store"))
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StoreError::poisoned("store"))
    }

    /// Add pre-built samples
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn add_samples(&self, samples: impl IntoIterator<Item = QuantitySample>) -> StoreResult<()> {
        self.write()?.samples.extend(samples);
        Ok(())
    }

    /// Seed `count` active-energy samples spread across the previous local
    /// calendar day. Quantities are deterministic for a fixed `seed`; units
    /// alternate between kilocalories and kilojoules so aggregation exercises
    /// unit conversion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn seed_previous_day_energy(&self, seed: u64, count: usize) -> StoreResult<()> {
        let window = TimeWindow::previous_day(Local::now());
        let span = (window.end - window.start).num_seconds().max(120);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = rng.gen_range(0..span - 60);
            let start = window.start + Duration::seconds(offset);
            let end = start + Duration::seconds(60);
            let kcal = rng.gen_range(2.0..18.0);
            let sample = if rng.gen_bool(0.5) {
                QuantitySample::energy(kcal, SampleUnit::Kilocalories, start, end)
            } else {
                QuantitySample::energy(
                    kcal * units::KILOJOULES_PER_KILOCALORIE,
                    SampleUnit::Kilojoules,
                    start,
                    end,
                )
            };
            samples.push(sample);
        }

        self.write()?.samples.extend(samples);
        Ok(())
    }

    /// Set or clear the biological-sex characteristic
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn set_biological_sex(&self, value: Option<BiologicalSex>) -> StoreResult<()> {
        self.write()?.biological_sex = value;
        Ok(())
    }

    /// Set or clear the date-of-birth characteristic
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn set_date_of_birth(&self, value: Option<NaiveDate>) -> StoreResult<()> {
        self.write()?.date_of_birth = value;
        Ok(())
    }

    /// Set or clear the blood-type characteristic
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn set_blood_type(&self, value: Option<BloodType>) -> StoreResult<()> {
        self.write()?.blood_type = value;
        Ok(())
    }

    /// Make the next authorization request fail with `reason`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn fail_authorization(&self, reason: impl Into<String>) -> StoreResult<()> {
        self.write()?.authorization_failure = Some(reason.into());
        Ok(())
    }

    /// Make sample queries fail until cleared
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn set_query_failure(&self, fail: bool) -> StoreResult<()> {
        self.write()?.fail_query = fail;
        Ok(())
    }

    /// Configure per-phase session failures for sessions created afterwards
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn inject_session_failures(&self, failures: FailureInjection) -> StoreResult<()> {
        self.write()?.failures = failures;
        Ok(())
    }

    /// Gate the begin-collection completion of sessions created afterwards.
    ///
    /// The completion is withheld until the returned [`Notify`] is notified,
    /// letting tests observe the transient starting state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the store lock is poisoned.
    pub fn gate_begin_collection(&self) -> StoreResult<Arc<Notify>> {
        let gate = Arc::new(Notify::new());
        self.write()?.begin_gate = Some(Arc::clone(&gate));
        Ok(gate)
    }

    /// Number of authorization requests that reached this store
    #[must_use]
    pub fn authorization_requests(&self) -> usize {
        self.read().map(|inner| inner.authorization_requests).unwrap_or(0)
    }

    /// Permission set from the most recent successful authorization request
    #[must_use]
    pub fn authorized_permissions(&self) -> Option<PermissionSet> {
        self.read().ok().and_then(|inner| inner.authorized.clone())
    }

    /// Workout records finalized against this store
    #[must_use]
    pub fn recorded_workouts(&self) -> Vec<WorkoutRecord> {
        self.read().map(|inner| inner.workouts.clone()).unwrap_or_default()
    }

    /// Whether a session is currently live
    #[must_use]
    pub fn has_live_session(&self) -> bool {
        self.read().map(|inner| inner.session_live).unwrap_or(false)
    }
}

#[async_trait]
impl HealthStore for SyntheticStore {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn is_available(&self) -> bool {
        self.read().map(|inner| inner.available).unwrap_or(false)
    }

    async fn request_authorization(&self, permissions: &PermissionSet) -> StoreResult<()> {
        let mut inner = self.write()?;
        inner.authorization_requests += 1;
        if let Some(reason) = inner.authorization_failure.clone() {
            return Err(StoreError::AuthorizationFailed { reason });
        }
        inner.authorized = Some(permissions.clone());
        Ok(())
    }

    async fn query_samples(&self, query: &SampleQuery) -> StoreResult<Vec<QuantitySample>> {
        let inner = self.read()?;
        if inner.fail_query {
            return Err(StoreError::Query {
                data_type: query.data_type,
                details: "injected query failure".into(),
            });
        }

        let mut samples: Vec<QuantitySample> = inner
            .samples
            .iter()
            .filter(|s| s.data_type == query.data_type && query.window.contains(s.start))
            .cloned()
            .collect();
        drop(inner);

        samples.sort_by_key(|s| s.end);
        if query.sort == SampleSort::EndDescending {
            samples.reverse();
        }
        if let Some(limit) = query.limit {
            samples.truncate(limit);
        }
        Ok(samples)
    }

    fn biological_sex(&self) -> StoreResult<BiologicalSex> {
        self.read()?
            .biological_sex
            .ok_or(StoreError::CharacteristicNotSet {
                characteristic: "biological sex",
            })
    }

    fn date_of_birth(&self) -> StoreResult<NaiveDate> {
        self.read()?
            .date_of_birth
            .ok_or(StoreError::CharacteristicNotSet {
                characteristic: "date of birth",
            })
    }

    fn blood_type(&self) -> StoreResult<BloodType> {
        self.read()?
            .blood_type
            .ok_or(StoreError::CharacteristicNotSet {
                characteristic: "blood type",
            })
    }

    fn create_session(&self, config: &WorkoutConfiguration) -> StoreResult<SessionParts> {
        let mut inner = self.write()?;
        if !inner.available {
            return Err(StoreError::Unavailable);
        }
        if inner.session_live {
            return Err(StoreError::SessionInProgress);
        }
        inner.session_live = true;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = Arc::new(SyntheticSession {
            state: RwLock::new(WorkoutState::Idle),
            events: events_tx.clone(),
        });
        let builder = Arc::new(SyntheticBuilder {
            store: Arc::clone(&self.inner),
            config: *config,
            failures: inner.failures,
            begin_gate: inner.begin_gate.clone(),
            events: events_tx,
            timing: RwLock::new(SessionTiming::default()),
        });

        Ok(SessionParts {
            session,
            builder,
            events: events_rx,
        })
    }
}

/// Synthetic platform session: tracks its own state and emits delegate events
struct SyntheticSession {
    state: RwLock<WorkoutState>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SyntheticSession {
    fn transition(&self, to: WorkoutState) {
        if let Ok(mut state) = self.state.write() {
            let from = *state;
            *state = to;
            let _ = self.events.send(SessionEvent::StateChanged { from, to });
        }
    }
}

impl WorkoutSessionHandle for SyntheticSession {
    fn start_activity(&self, _at: DateTime<Utc>) {
        self.transition(WorkoutState::Active);
    }

    fn pause(&self) {
        self.transition(WorkoutState::Paused);
    }

    fn resume(&self) {
        self.transition(WorkoutState::Active);
    }

    fn end(&self) {
        self.transition(WorkoutState::Ended);
    }
}

#[derive(Debug, Default)]
struct SessionTiming {
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

/// Synthetic data-collection builder.
///
/// Simulates live collection by accruing active energy at a fixed rate over
/// the collected interval. Releases the store's single-session slot when the
/// last handle drops.
struct SyntheticBuilder {
    store: Arc<RwLock<Inner>>,
    config: WorkoutConfiguration,
    failures: FailureInjection,
    begin_gate: Option<Arc<Notify>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    timing: RwLock<SessionTiming>,
}

#[async_trait]
impl WorkoutBuilderHandle for SyntheticBuilder {
    async fn begin_collection(&self, at: DateTime<Utc>) -> StoreResult<()> {
        if let Some(gate) = self.begin_gate.clone() {
            gate.notified().await;
        }
        if self.failures.begin_collection {
            return Err(StoreError::Collection {
                phase: CollectionPhase::Begin,
                details: "injected begin-collection failure".into(),
            });
        }
        self.timing
            .write()
            .map_err(|_| StoreError::poisoned("session timing"))?
            .started_at = Some(at);
        let _ = self.events.send(SessionEvent::DataCollected {
            data_type: HealthDataType::ActiveEnergyBurned,
        });
        Ok(())
    }

    async fn end_collection(&self, at: DateTime<Utc>) -> StoreResult<()> {
        if self.failures.end_collection {
            return Err(StoreError::Collection {
                phase: CollectionPhase::End,
                details: "injected end-collection failure".into(),
            });
        }
        self.timing
            .write()
            .map_err(|_| StoreError::poisoned("session timing"))?
            .ended_at = Some(at);
        Ok(())
    }

    async fn finish(&self) -> StoreResult<WorkoutRecord> {
        if self.failures.finalize {
            return Err(StoreError::Collection {
                phase: CollectionPhase::Finalize,
                details: "injected finalize failure".into(),
            });
        }

        let (started_at, ended_at) = {
            let timing = self
                .timing
                .read()
                .map_err(|_| StoreError::poisoned("session timing"))?;
            (timing.started_at, timing.ended_at)
        };
        let ended_at = ended_at.unwrap_or_else(Utc::now);
        let started_at = started_at.unwrap_or(ended_at);
        let collected_seconds = (ended_at - started_at).num_seconds().max(0) as f64;

        let record = WorkoutRecord {
            id: Uuid::new_v4(),
            activity: self.config.activity,
            location: self.config.location,
            started_at,
            ended_at,
            total_active_energy_kcal: collected_seconds
                * defaults::LIVE_ENERGY_KCAL_PER_SECOND,
        };

        self.store
            .write()
            .map_err(|_| StoreError::poisoned("store"))?
            .workouts
            .push(record.clone());
        Ok(record)
    }
}

impl Drop for SyntheticBuilder {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.store.write() {
            inner.session_live = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy_at(kcal: f64, minutes_after: i64, window: TimeWindow) -> QuantitySample {
        let start = window.start + Duration::minutes(minutes_after);
        QuantitySample::energy(kcal, SampleUnit::Kilocalories, start, start + Duration::minutes(1))
    }

    #[tokio::test]
    async fn query_filters_sorts_and_limits() {
        let store = SyntheticStore::new();
        let window = TimeWindow::previous_day(Local::now());
        store
            .add_samples([
                energy_at(3.0, 30, window),
                energy_at(1.0, 10, window),
                energy_at(2.0, 20, window),
            ])
            .unwrap();

        let query = SampleQuery::unlimited(HealthDataType::ActiveEnergyBurned, window);
        let samples = store.query_samples(&query).await.unwrap();
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);

        let limited = SampleQuery {
            limit: Some(2),
            ..query
        };
        assert_eq!(store.query_samples(&limited).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeding_is_deterministic() {
        let first = SyntheticStore::new();
        let second = SyntheticStore::new();
        first.seed_previous_day_energy(7, 16).unwrap();
        second.seed_previous_day_energy(7, 16).unwrap();

        let window = TimeWindow::previous_day(Local::now());
        let query = SampleQuery::unlimited(HealthDataType::ActiveEnergyBurned, window);
        let total = |samples: &[QuantitySample]| -> f64 {
            samples.iter().filter_map(QuantitySample::energy_kilocalories).sum()
        };
        let a = total(&first.query_samples(&query).await.unwrap());
        let b = total(&second.query_samples(&query).await.unwrap());
        assert!((a - b).abs() < 1e-9);
        assert!(a > 0.0);
    }

    #[test]
    fn second_session_is_rejected_until_handles_drop() {
        let store = SyntheticStore::new();
        let config = WorkoutConfiguration::default();

        let parts = store.create_session(&config).unwrap();
        assert!(matches!(
            store.create_session(&config),
            Err(StoreError::SessionInProgress)
        ));

        drop(parts);
        assert!(store.create_session(&config).is_ok());
    }

    #[test]
    fn unavailable_store_rejects_sessions() {
        let store = SyntheticStore::unavailable();
        assert!(matches!(
            store.create_session(&WorkoutConfiguration::default()),
            Err(StoreError::Unavailable)
        ));
    }
}
