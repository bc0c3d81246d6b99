// ABOUTME: Structured error types for health store operations
// ABOUTME: Defines StoreError variants for authorization, query, characteristic, and session failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Unified Error Handling
//!
//! One error type covers every fallible store operation. Callers that need to
//! distinguish outcomes match on the variant; callers that only report pass
//! the `Display` form through. Authorization failure is deliberately a typed
//! result returned to the caller rather than a process abort: the embedding
//! layer decides whether the application can continue without health data.

use crate::models::HealthDataType;

/// Phase of the workout data-collection lifecycle that reported a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionPhase {
    /// Beginning sample collection after session construction
    Begin,
    /// Ending sample collection during shutdown
    End,
    /// Finalizing the collected data into a persisted workout record
    Finalize,
}

impl std::fmt::Display for CollectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Begin => f.write_str("begin-collection"),
            Self::End => f.write_str("end-collection"),
            Self::Finalize => f.write_str("finalize"),
        }
    }
}

/// Common error type for health store operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Health data is not available on this device
    #[error("health data is not available on this device")]
    Unavailable,

    /// The combined authorization request itself was rejected by the platform
    #[error("authorization request failed: {reason}")]
    AuthorizationFailed {
        /// Platform-reported reason, e.g. a missing capability declaration
        reason: String,
    },

    /// A sample query could not be completed
    #[error("sample query for {data_type} failed: {details}")]
    Query {
        /// Data type the query targeted
        data_type: HealthDataType,
        /// Platform-reported failure details
        details: String,
    },

    /// A characteristic has no value recorded in the store
    #[error("characteristic '{characteristic}' is not set")]
    CharacteristicNotSet {
        /// Name of the characteristic that could not be read
        characteristic: &'static str,
    },

    /// A workout session could not be constructed
    #[error("workout session could not be constructed: {details}")]
    SessionConstruction {
        /// Platform-reported construction failure details
        details: String,
    },

    /// A workout session is already live on this store
    #[error("a workout session is already in progress")]
    SessionInProgress,

    /// A workout data-collection phase reported failure
    #[error("workout {phase} failed: {details}")]
    Collection {
        /// Which lifecycle phase failed
        phase: CollectionPhase,
        /// Platform-reported failure details
        details: String,
    },

    /// Internal store state was unusable (e.g. a poisoned lock)
    #[error("store state unavailable: {details}")]
    Internal {
        /// Description of the internal fault
        details: String,
    },
}

impl StoreError {
    /// Shorthand for an [`StoreError::Internal`] from a poisoned lock
    #[must_use]
    pub fn poisoned(what: &str) -> Self {
        Self::Internal {
            details: format!("lock poisoned: {what}"),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
