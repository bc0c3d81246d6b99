// ABOUTME: Authorization gateway issuing one combined permission request per profile
// ABOUTME: Defines the phone and watch permission profiles and the typed request outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Authorization Gateway
//!
//! One component, two configurations. The phone and watch surfaces differ
//! only in which data types they ask for, so the difference lives in a
//! [`GatewayProfile`] value rather than in parallel gateway types.
//!
//! Authorization failure is returned to the caller as a typed error; the
//! gateway never aborts the process. When the store reports health data
//! unavailable the request is skipped entirely: the platform is not called
//! and the outcome is [`AuthorizationOutcome::Unavailable`].

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{StoreError, StoreResult};
use crate::models::{HealthDataType, PermissionSet};
use crate::store::HealthStore;

/// Which fixed permission set a gateway requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayProfile {
    /// Phone surface: read and write all tracked types
    Phone,
    /// Watch surface: write workouts only, read everything
    Watch,
}

impl GatewayProfile {
    /// The permission set this profile requests
    #[must_use]
    pub fn permissions(self) -> PermissionSet {
        let quantity_types = [
            HealthDataType::ActiveEnergyBurned,
            HealthDataType::DistanceCycling,
            HealthDataType::DistanceWalkingRunning,
            HealthDataType::DistanceWheelchair,
            HealthDataType::HeartRate,
        ];
        match self {
            Self::Phone => {
                let all = quantity_types
                    .into_iter()
                    .chain([HealthDataType::Workout]);
                PermissionSet::new(all.clone(), all)
            }
            Self::Watch => PermissionSet::new(
                [HealthDataType::Workout],
                quantity_types.into_iter().chain([HealthDataType::Workout]),
            ),
        }
    }

    /// Whether this profile's surface also reads personal characteristics
    #[must_use]
    pub fn includes_characteristics(self) -> bool {
        matches!(self, Self::Phone)
    }
}

impl FromStr for GatewayProfile {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "watch" => Ok(Self::Watch),
            other => Err(StoreError::Internal {
                details: format!("unknown gateway profile '{other}' (expected phone or watch)"),
            }),
        }
    }
}

/// Result of an authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// The combined request completed. Per platform privacy policy this does
    /// not reveal whether the user granted or denied any individual type.
    Requested,
    /// Health data is unavailable on this device; no request was made.
    Unavailable,
}

/// Requests read/write permission for a fixed set of data types
pub struct AuthorizationGateway {
    store: Arc<dyn HealthStore>,
    permissions: PermissionSet,
}

impl AuthorizationGateway {
    /// Build a gateway over `store` requesting `permissions`
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, permissions: PermissionSet) -> Self {
        Self { store, permissions }
    }

    /// The permission set this gateway requests
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Issue the combined authorization request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AuthorizationFailed`] when the platform rejects
    /// the request itself. The caller decides whether the application can
    /// continue without health data.
    pub async fn request(&self) -> StoreResult<AuthorizationOutcome> {
        if !self.store.is_available() {
            debug!(store = self.store.name(), "health data unavailable; skipping authorization request");
            return Ok(AuthorizationOutcome::Unavailable);
        }

        self.store.request_authorization(&self.permissions).await?;
        info!(
            store = self.store.name(),
            write_types = self.permissions.write.len(),
            read_types = self.permissions.read.len(),
            "authorization requested"
        );
        Ok(AuthorizationOutcome::Requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_profile_shares_everything() {
        let set = GatewayProfile::Phone.permissions();
        assert_eq!(set.write, set.read);
        assert_eq!(set.write.len(), 6);
        assert!(set.write.contains(&HealthDataType::Workout));
    }

    #[test]
    fn watch_profile_writes_workouts_only() {
        let set = GatewayProfile::Watch.permissions();
        assert_eq!(set.write.len(), 1);
        assert!(set.write.contains(&HealthDataType::Workout));
        assert_eq!(set.read.len(), 6);
    }

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!("Phone".parse::<GatewayProfile>().ok(), Some(GatewayProfile::Phone));
        assert_eq!("watch".parse::<GatewayProfile>().ok(), Some(GatewayProfile::Watch));
        assert!("tablet".parse::<GatewayProfile>().is_err());
    }
}
