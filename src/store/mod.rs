// ABOUTME: Health store abstraction for unified access to platform health data
// ABOUTME: Defines the HealthStore trait plus workout session and builder handle traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Pluggable Health Store
//!
//! The [`HealthStore`] trait is the single seam between the portable
//! components (authorization gateway, sample reader, workout controller) and
//! whatever actually holds the health data. A device backend wraps the
//! platform health database; [`synthetic::SyntheticStore`] keeps everything
//! in memory for development and tests.
//!
//! ## Contract
//!
//! - **Availability**: `is_available` reports whether health data exists on
//!   this device at all. Callers treat `false` as "do not even ask".
//! - **Authorization**: one combined request for a read-set and write-set.
//!   Per platform privacy policy the store never reveals per-type grant or
//!   denial; success only means the request completed.
//! - **Samples**: time-bounded, sorted, optionally limited quantity queries.
//! - **Characteristics**: synchronous value-or-error accessors.
//! - **Workout sessions**: `create_session` hands out exclusive session and
//!   builder handles plus an event stream; at most one session is live per
//!   store at a time.
//!
//! ## Thread Safety
//!
//! All trait objects are `Send + Sync`; handles use interior mutability so a
//! controller can drive them from spawned tasks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::mpsc;

use crate::errors::StoreResult;
use crate::models::{
    BiologicalSex, BloodType, HealthDataType, PermissionSet, QuantitySample, TimeWindow,
    WorkoutConfiguration, WorkoutRecord, WorkoutState,
};

pub mod synthetic;

/// Sort order applied to query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSort {
    /// Ascending by sample end timestamp
    EndAscending,
    /// Descending by sample end timestamp
    EndDescending,
}

/// Parameters for a time-bounded sample query
#[derive(Debug, Clone)]
pub struct SampleQuery {
    /// Data type to fetch
    pub data_type: HealthDataType,
    /// Window samples must start inside
    pub window: TimeWindow,
    /// Maximum number of results; `None` means unlimited
    pub limit: Option<usize>,
    /// Result ordering
    pub sort: SampleSort,
}

impl SampleQuery {
    /// Unlimited query over `window`, ordered by end timestamp ascending
    #[must_use]
    pub fn unlimited(data_type: HealthDataType, window: TimeWindow) -> Self {
        Self {
            data_type,
            window,
            limit: None,
            sort: SampleSort::EndAscending,
        }
    }
}

/// Events a live workout session emits while it runs.
///
/// The controller observes these and records them in its log; nothing else in
/// the lifecycle depends on them.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The platform session moved between states
    StateChanged {
        /// State before the transition
        from: WorkoutState,
        /// State after the transition
        to: WorkoutState,
    },
    /// The builder collected data of the given type
    DataCollected {
        /// Data type that was collected
        data_type: HealthDataType,
    },
    /// The platform session reported an error
    SessionError {
        /// Platform-reported details
        details: String,
    },
}

/// Handles produced by [`HealthStore::create_session`]
pub struct SessionParts {
    /// Exclusive handle on the platform session
    pub session: Arc<dyn WorkoutSessionHandle>,
    /// Exclusive handle on the session's data-collection builder
    pub builder: Arc<dyn WorkoutBuilderHandle>,
    /// Delegate-style event stream for this session
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

/// Platform workout session handle.
///
/// `pause` and `resume` are best-effort: the platform exposes no completion
/// signal for them, so they carry no failure path.
pub trait WorkoutSessionHandle: Send + Sync {
    /// Start the activity at the given instant
    fn start_activity(&self, at: DateTime<Utc>);

    /// Request the platform pause the session
    fn pause(&self);

    /// Request the platform resume the session
    fn resume(&self);

    /// Request the platform end the session
    fn end(&self);
}

/// Platform data-collection builder handle.
///
/// The three methods mirror the platform's asynchronous completion callbacks:
/// the returned future resolves when the platform reports the outcome.
#[async_trait]
pub trait WorkoutBuilderHandle: Send + Sync {
    /// Begin collecting samples at the given instant
    async fn begin_collection(&self, at: DateTime<Utc>) -> StoreResult<()>;

    /// Stop collecting samples at the given instant
    async fn end_collection(&self, at: DateTime<Utc>) -> StoreResult<()>;

    /// Finalize collected data into a persisted workout record
    async fn finish(&self) -> StoreResult<WorkoutRecord>;
}

/// Core health store trait shared by all backends
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Backend name (e.g. "synthetic")
    fn name(&self) -> &'static str;

    /// Whether health data is available on this device
    fn is_available(&self) -> bool;

    /// Issue one combined authorization request for the given permission set.
    ///
    /// Completion does not reveal per-type grant or denial.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::StoreError::AuthorizationFailed`] when the
    /// platform rejects the request itself (e.g. a missing capability
    /// declaration).
    async fn request_authorization(&self, permissions: &PermissionSet) -> StoreResult<()>;

    /// Run a sample query and return the matching samples.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::StoreError::Query`] when the query cannot be
    /// completed.
    async fn query_samples(&self, query: &SampleQuery) -> StoreResult<Vec<QuantitySample>>;

    /// Read the biological sex characteristic
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::StoreError::CharacteristicNotSet`] when the
    /// store holds no value.
    fn biological_sex(&self) -> StoreResult<BiologicalSex>;

    /// Read the date-of-birth characteristic
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::StoreError::CharacteristicNotSet`] when the
    /// store holds no value.
    fn date_of_birth(&self) -> StoreResult<NaiveDate>;

    /// Read the blood-type characteristic
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::StoreError::CharacteristicNotSet`] when the
    /// store holds no value.
    fn blood_type(&self) -> StoreResult<BloodType>;

    /// Construct a workout session from `config`.
    ///
    /// Handles are created synchronously; collection itself begins only when
    /// the caller drives the builder. At most one session may be live per
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::StoreError::SessionInProgress`] while another
    /// session is live, or
    /// [`crate::errors::StoreError::SessionConstruction`] /
    /// [`crate::errors::StoreError::Unavailable`] when construction fails.
    fn create_session(&self, config: &WorkoutConfiguration) -> StoreResult<SessionParts>;
}
