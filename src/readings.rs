// ABOUTME: Sample reader aggregating the previous calendar day's energy samples
// ABOUTME: Publishes the summed reading through a watch channel; query errors keep the prior value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Sample Reader
//!
//! Issues one time-bounded, end-ascending, unlimited query per refresh and
//! sums the results in kilocalories. The window is fixed: the full previous
//! calendar day in local time. An empty result set publishes exactly `0.0`;
//! a failed query publishes nothing, so observers keep the prior reading.
//!
//! In the phone configuration a refresh also triggers the characteristic
//! reader as an unordered side effect of the same call.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::characteristics::CharacteristicReader;
use crate::models::{AggregateReading, HealthDataType, QuantitySample, TimeWindow};
use crate::store::{HealthStore, SampleQuery};

/// Configuration differences between the reader variants
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Data type the aggregate is computed over
    pub data_type: HealthDataType,
    /// Whether a refresh also re-reads personal characteristics
    pub include_characteristics: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            data_type: HealthDataType::ActiveEnergyBurned,
            include_characteristics: false,
        }
    }
}

/// Reads and aggregates the previous day's samples
pub struct SampleReader {
    store: Arc<dyn HealthStore>,
    options: ReaderOptions,
    published: watch::Sender<AggregateReading>,
    characteristics: Option<CharacteristicReader>,
}

impl SampleReader {
    /// Build a reader over `store` with the given options
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, options: ReaderOptions) -> Self {
        let (published, _) = watch::channel(AggregateReading::empty());
        let characteristics = options
            .include_characteristics
            .then(|| CharacteristicReader::new(Arc::clone(&store)));
        Self {
            store,
            options,
            published,
            characteristics,
        }
    }

    /// Subscribe to published aggregate updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AggregateReading> {
        self.published.subscribe()
    }

    /// The most recently published reading
    #[must_use]
    pub fn current(&self) -> AggregateReading {
        *self.published.borrow()
    }

    /// The characteristic reader, when the options include one
    #[must_use]
    pub fn characteristics(&self) -> Option<&CharacteristicReader> {
        self.characteristics.as_ref()
    }

    /// Query the previous calendar day and publish the summed reading.
    ///
    /// Returns the reading that is published after the attempt: the new sum
    /// on success, the retained prior reading on query failure.
    pub async fn refresh(&self) -> AggregateReading {
        let window = TimeWindow::previous_day(Local::now());
        let query = SampleQuery::unlimited(self.options.data_type, window);

        match self.store.query_samples(&query).await {
            Ok(samples) => {
                let kilocalories: f64 = samples
                    .iter()
                    .filter_map(QuantitySample::energy_kilocalories)
                    .sum();
                info!(
                    samples = samples.len(),
                    kilocalories, "previous-day aggregate computed"
                );
                let _ = self
                    .published
                    .send_replace(AggregateReading { kilocalories, window });
            }
            Err(err) => {
                warn!(error = %err, "sample query failed; keeping previous reading");
            }
        }

        if let Some(characteristics) = &self.characteristics {
            characteristics.refresh();
        }

        self.current()
    }
}
