// ABOUTME: Environment-driven configuration for the demo surface
// ABOUTME: Reads profile selection and synthetic-data parameters from VITALSTORE_* variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! Environment-only configuration. There is no configuration file; every
//! knob is a `VITALSTORE_*` variable with a sensible default.

use std::env;

use crate::authorization::GatewayProfile;
use crate::constants::{defaults, env_vars};

/// Configuration for the demo binary
#[derive(Debug, Clone, Copy)]
pub struct DemoConfig {
    /// Permission profile the gateway requests (phone or watch)
    pub profile: GatewayProfile,
    /// Seed for deterministic synthetic sample generation
    pub seed: u64,
    /// Number of previous-day energy samples to seed
    pub sample_count: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            profile: GatewayProfile::Watch,
            seed: defaults::SYNTHETIC_SEED,
            sample_count: defaults::SYNTHETIC_SAMPLE_COUNT,
        }
    }
}

impl DemoConfig {
    /// Build configuration from `VITALSTORE_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            profile: env::var(env_vars::PROFILE)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(base.profile),
            seed: env::var(env_vars::SEED)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(base.seed),
            sample_count: env::var(env_vars::SAMPLE_COUNT)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(base.sample_count),
        }
    }
}
