// ABOUTME: Characteristic reader for biological sex, age, and blood type
// ABOUTME: Reads each field independently so partial success updates only what succeeded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Characteristic Reader
//!
//! The three characteristics are fetched independently. A failed read of one
//! field skips only that field and leaves its previously published value in
//! place; partial success is the normal case, not an error state.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use tokio::sync::watch;
use tracing::debug;

use crate::models::CharacteristicProfile;
use crate::store::HealthStore;

/// Age in whole years as the raw difference between calendar years.
///
/// Whether the birthday has already occurred in the current year is not
/// considered.
#[must_use]
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - date_of_birth.year()
}

/// Reads personal characteristics and publishes the merged profile
pub struct CharacteristicReader {
    store: Arc<dyn HealthStore>,
    published: watch::Sender<CharacteristicProfile>,
}

impl CharacteristicReader {
    /// Build a reader over `store` with an empty published profile
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        let (published, _) = watch::channel(CharacteristicProfile::default());
        Self { store, published }
    }

    /// Subscribe to published profile updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CharacteristicProfile> {
        self.published.subscribe()
    }

    /// The most recently published profile
    #[must_use]
    pub fn current(&self) -> CharacteristicProfile {
        self.published.borrow().clone()
    }

    /// Re-read all three characteristics against today's date
    pub fn refresh(&self) -> CharacteristicProfile {
        self.refresh_at(Local::now().date_naive())
    }

    /// Re-read all three characteristics, deriving age against `today`.
    ///
    /// Each field updates independently; a failed read retains the field's
    /// previous value.
    pub fn refresh_at(&self, today: NaiveDate) -> CharacteristicProfile {
        let mut profile = self.current();

        match self.store.biological_sex() {
            Ok(sex) => profile.biological_sex = Some(sex),
            Err(err) => debug!(error = %err, "keeping previous biological sex"),
        }
        match self.store.date_of_birth() {
            Ok(dob) => profile.age_years = Some(age_in_years(dob, today)),
            Err(err) => debug!(error = %err, "keeping previous age"),
        }
        match self.store.blood_type() {
            Ok(blood) => profile.blood_type = Some(blood),
            Err(err) => debug!(error = %err, "keeping previous blood type"),
        }

        let _ = self.published.send_replace(profile.clone());
        profile
    }
}
