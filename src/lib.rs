// ABOUTME: Main library entry point for the vitalstore health-data client
// ABOUTME: Exposes authorization, sample reading, and workout session tracking over pluggable stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

#![deny(unsafe_code)]

//! # vitalstore
//!
//! A client-side facade over a platform health-data store. The concrete store
//! (device health database, simulator, test double) sits behind the
//! [`store::HealthStore`] trait; everything above it is portable:
//!
//! - **Authorization gateway**: one combined permission request for a fixed
//!   read-set and write-set of health data types.
//! - **Sample reader**: time-bounded quantity queries aggregated into a single
//!   published reading (previous calendar day, kilocalories).
//! - **Characteristic reader**: biological sex, age, and blood type with
//!   per-field partial success.
//! - **Workout session controller**: start / pause / resume / end lifecycle
//!   driven by asynchronous completion signals, mirrored into an observable
//!   snapshot (state, sticky error flag, append-only log).
//!
//! ## Observability model
//!
//! Components never render anything. Published state flows through
//! [`tokio::sync::watch`] channels so any frontend (CLI, GUI binding, test)
//! can subscribe without coupling the components to a rendering technology.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitalstore::authorization::{AuthorizationGateway, GatewayProfile};
//! use vitalstore::store::synthetic::SyntheticStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(SyntheticStore::new());
//! let gateway = AuthorizationGateway::new(store, GatewayProfile::Watch.permissions());
//! let outcome = gateway.request().await?;
//! println!("authorization outcome: {outcome:?}");
//! # Ok(())
//! # }
//! ```

/// Combined permission requests against the platform store
pub mod authorization;

/// Personal characteristic reads with per-field partial success
pub mod characteristics;

/// Environment-driven configuration for the demo surface
pub mod config;

/// Application constants organized by domain
pub mod constants;

/// Structured error types shared by all store operations
pub mod errors;

/// Logging configuration and structured output
pub mod logging;

/// Common data models for health samples, characteristics, and workouts
pub mod models;

/// Time-windowed sample aggregation with observable publication
pub mod readings;

/// Health store abstraction and the in-memory synthetic implementation
pub mod store;

/// Workout session lifecycle controller
pub mod workout;
