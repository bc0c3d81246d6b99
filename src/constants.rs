// ABOUTME: Application constants organized by domain
// ABOUTME: Service identity, unit conversions, environment variable names, and demo defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! Constants module
//!
//! Constants are grouped into small domain modules rather than a single flat
//! list.

/// Service identity
pub mod service {
    /// Service name used in logs
    pub const NAME: &str = "vitalstore";
}

/// Unit conversion factors
pub mod units {
    /// Kilojoules per kilocalorie (thermochemical calorie)
    pub const KILOJOULES_PER_KILOCALORIE: f64 = 4.184;
}

/// Environment variable names read by the demo configuration
pub mod env_vars {
    /// Permission profile: `phone` or `watch`
    pub const PROFILE: &str = "VITALSTORE_PROFILE";
    /// Seed for deterministic synthetic sample generation
    pub const SEED: &str = "VITALSTORE_SEED";
    /// Number of synthetic samples to seed for the previous day
    pub const SAMPLE_COUNT: &str = "VITALSTORE_SAMPLES";
}

/// Default values for the demo surface
pub mod defaults {
    /// Default synthetic-data seed
    pub const SYNTHETIC_SEED: u64 = 42;
    /// Default number of seeded previous-day energy samples
    pub const SYNTHETIC_SAMPLE_COUNT: usize = 24;
    /// Energy accumulation rate the synthetic builder simulates while a
    /// session is collecting, in kilocalories per second
    pub const LIVE_ENERGY_KCAL_PER_SECOND: f64 = 0.15;
}
