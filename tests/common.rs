// ABOUTME: Shared fixtures and helpers for vitalstore integration tests
// ABOUTME: Store coercion and snapshot-waiting utilities used across test files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors
#![allow(dead_code, missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use vitalstore::models::WorkoutState;
use vitalstore::store::synthetic::SyntheticStore;
use vitalstore::store::HealthStore;
use vitalstore::workout::WorkoutSnapshot;

/// Coerce a concrete synthetic store to the trait object the components take
pub fn dyn_store(store: &Arc<SyntheticStore>) -> Arc<dyn HealthStore> {
    Arc::clone(store) as Arc<dyn HealthStore>
}

/// Wait until the published snapshot satisfies `pred`, with a test timeout
pub async fn wait_snapshot(
    snapshots: &mut watch::Receiver<WorkoutSnapshot>,
    pred: impl FnMut(&WorkoutSnapshot) -> bool,
) -> WorkoutSnapshot {
    let snapshot = timeout(Duration::from_secs(2), snapshots.wait_for(pred))
        .await
        .expect("timed out waiting for snapshot")
        .expect("controller dropped");
    (*snapshot).clone()
}

/// Wait until the controller reaches `state`
pub async fn wait_for_state(
    snapshots: &mut watch::Receiver<WorkoutSnapshot>,
    state: WorkoutState,
) -> WorkoutSnapshot {
    wait_snapshot(snapshots, |s| s.state == state).await
}

/// Wait until the store's single-session slot is released again
pub async fn wait_released(store: &Arc<SyntheticStore>) {
    for _ in 0..100 {
        if !store.has_live_session() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert!(!store.has_live_session(), "session slot was never released");
}
