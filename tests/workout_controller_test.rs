// ABOUTME: Integration tests for the workout session controller state machine
// ABOUTME: Covers lifecycle transitions, failure injection, handle release, and log semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use vitalstore::models::{WorkoutConfiguration, WorkoutState};
use vitalstore::store::synthetic::{FailureInjection, SyntheticStore};
use vitalstore::workout::WorkoutController;

fn controller_over(store: &Arc<SyntheticStore>) -> WorkoutController {
    WorkoutController::new(common::dyn_store(store), WorkoutConfiguration::default())
}

#[tokio::test]
async fn start_success_reaches_active_with_clean_error_flag() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    let snapshot = common::wait_for_state(&mut snapshots, WorkoutState::Active).await;

    assert!(!snapshot.error);
    assert!(snapshot.log.contains("workout start requested"));
    assert!(snapshot.log.contains("workout start succeeded"));
    assert!(store.has_live_session());
}

#[tokio::test]
async fn transient_starting_state_is_observable() {
    let store = Arc::new(SyntheticStore::new());
    let gate = store.gate_begin_collection().unwrap();
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    let starting = common::wait_for_state(&mut snapshots, WorkoutState::Starting).await;
    assert!(!starting.error);

    gate.notify_one();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
}

#[tokio::test]
async fn begin_collection_failure_fails_the_session_and_releases_handles() {
    let store = Arc::new(SyntheticStore::new());
    store
        .inject_session_failures(FailureInjection {
            begin_collection: true,
            ..FailureInjection::default()
        })
        .unwrap();
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    let snapshot = common::wait_for_state(&mut snapshots, WorkoutState::Failed).await;

    assert!(snapshot.error);
    assert!(snapshot.log.contains("workout start failed"));
    common::wait_released(&store).await;
}

#[tokio::test]
async fn pause_and_resume_toggle_between_active_and_paused() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;

    controller.stop();
    let paused = common::wait_for_state(&mut snapshots, WorkoutState::Paused).await;
    assert!(paused.log.contains("paused"));

    // A second pause from Paused is logged and ignored.
    controller.stop();
    let ignored = common::wait_snapshot(&mut snapshots, |s| s.log.contains("pause ignored")).await;
    assert_eq!(ignored.state, WorkoutState::Paused);

    controller.resume();
    let resumed = common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    assert!(resumed.log.contains("resumed"));
    assert!(!resumed.error);
}

#[tokio::test]
async fn end_success_finalizes_a_workout_record() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    controller.end();
    let snapshot = common::wait_for_state(&mut snapshots, WorkoutState::Ended).await;

    assert!(!snapshot.error);
    assert!(snapshot.log.contains("workout end requested"));
    assert!(snapshot.log.contains("workout end succeeded"));
    assert_eq!(store.recorded_workouts().len(), 1);
    common::wait_released(&store).await;
}

#[tokio::test]
async fn end_is_valid_from_paused() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    controller.stop();
    common::wait_for_state(&mut snapshots, WorkoutState::Paused).await;
    controller.end();

    common::wait_for_state(&mut snapshots, WorkoutState::Ended).await;
    assert_eq!(store.recorded_workouts().len(), 1);
}

#[tokio::test]
async fn end_collection_failure_sets_the_sticky_error_flag() {
    let store = Arc::new(SyntheticStore::new());
    store
        .inject_session_failures(FailureInjection {
            end_collection: true,
            ..FailureInjection::default()
        })
        .unwrap();
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    controller.end();
    let snapshot = common::wait_for_state(&mut snapshots, WorkoutState::Failed).await;

    assert!(snapshot.error);
    assert!(snapshot.log.contains("workout end failed"));
    assert!(store.recorded_workouts().is_empty());
    common::wait_released(&store).await;
}

#[tokio::test]
async fn finalize_failure_also_fails_the_session() {
    let store = Arc::new(SyntheticStore::new());
    store
        .inject_session_failures(FailureInjection {
            finalize: true,
            ..FailureInjection::default()
        })
        .unwrap();
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    controller.end();
    let snapshot = common::wait_for_state(&mut snapshots, WorkoutState::Failed).await;

    assert!(snapshot.error);
    assert!(store.recorded_workouts().is_empty());
    common::wait_released(&store).await;
}

#[tokio::test]
async fn reset_log_clears_text_but_not_error_or_state() {
    let store = Arc::new(SyntheticStore::new());
    store
        .inject_session_failures(FailureInjection {
            begin_collection: true,
            ..FailureInjection::default()
        })
        .unwrap();
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    let failed = common::wait_for_state(&mut snapshots, WorkoutState::Failed).await;
    assert!(failed.error);
    assert!(!failed.log.is_empty());

    controller.reset_log();
    let cleared = common::wait_snapshot(&mut snapshots, |s| s.log.is_empty()).await;

    assert!(cleared.error, "reset_log must not clear the error flag");
    assert_eq!(cleared.state, WorkoutState::Failed);
}

#[tokio::test]
async fn end_outside_active_or_paused_is_ignored() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.end();
    let snapshot = common::wait_snapshot(&mut snapshots, |s| s.log.contains("end ignored")).await;

    assert_eq!(snapshot.state, WorkoutState::Idle);
    assert!(!snapshot.error);
}

#[tokio::test]
async fn start_is_only_valid_from_idle() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;

    controller.start();
    let snapshot = common::wait_snapshot(&mut snapshots, |s| s.log.contains("start ignored")).await;
    assert_eq!(snapshot.state, WorkoutState::Active);
}

#[tokio::test]
async fn delegate_events_appear_in_the_log() {
    let store = Arc::new(SyntheticStore::new());
    let controller = controller_over(&store);
    let mut snapshots = controller.subscribe();

    controller.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;

    common::wait_snapshot(&mut snapshots, |s| s.log.contains("session state changed")).await;
    common::wait_snapshot(&mut snapshots, |s| {
        s.log.contains("session collected active_energy_burned")
    })
    .await;
}

#[tokio::test]
async fn store_accepts_a_fresh_session_after_the_previous_one_ended() {
    let store = Arc::new(SyntheticStore::new());

    let first = controller_over(&store);
    let mut snapshots = first.subscribe();
    first.start();
    common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    first.end();
    common::wait_for_state(&mut snapshots, WorkoutState::Ended).await;
    common::wait_released(&store).await;

    let second = controller_over(&store);
    let mut snapshots = second.subscribe();
    second.start();
    let snapshot = common::wait_for_state(&mut snapshots, WorkoutState::Active).await;
    assert!(!snapshot.error);
}
