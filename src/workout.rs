// ABOUTME: Workout session lifecycle controller built as a single-owner message loop
// ABOUTME: Sequences start/pause/resume/end and mirrors async completions into an observable snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! # Workout Session Controller
//!
//! Owns the platform session and builder handles and sequences the lifecycle:
//! start → (pause ⇄ resume)* → end, each boundary driven by an asynchronous
//! completion from the store.
//!
//! ## Ownership model
//!
//! Completion signals arrive on arbitrary tasks. Rather than lock shared
//! state, the controller runs a single message loop that exclusively owns the
//! state and the handles; public methods and completion signals alike are
//! messages into that loop. Observers receive consistent
//! [`WorkoutSnapshot`]s through a watch channel and can never see a torn
//! update.
//!
//! ## Error policy
//!
//! Start and end failures set a sticky error flag and are recorded in the
//! log; the controller does not retry, and the handles are released so the
//! store can host a fresh session. Pause and resume are best-effort with no
//! failure path. [`WorkoutController::reset_log`] clears the log text only —
//! the error flag and the state survive it.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::errors::StoreResult;
use crate::models::{WorkoutConfiguration, WorkoutRecord, WorkoutState};
use crate::store::{
    HealthStore, SessionEvent, SessionParts, WorkoutBuilderHandle, WorkoutSessionHandle,
};

/// Consistent view of the controller's observable state
#[derive(Debug, Clone)]
pub struct WorkoutSnapshot {
    /// Current lifecycle state
    pub state: WorkoutState,
    /// Sticky error flag; set by start/end failures, never auto-cleared
    pub error: bool,
    /// Append-only, timestamped transition log
    pub log: String,
}

enum Command {
    Start,
    Stop,
    Resume,
    End,
    ResetLog,
    Shutdown,
    StartPhase(StoreResult<()>),
    EndPhase(StoreResult<WorkoutRecord>),
    Session(SessionEvent),
}

/// Drives one workout session at a time against a health store
pub struct WorkoutController {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<WorkoutSnapshot>,
}

impl WorkoutController {
    /// Spawn a controller over `store` using `config` for sessions it starts
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, config: WorkoutConfiguration) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (publish, snapshot) = watch::channel(WorkoutSnapshot {
            state: WorkoutState::Idle,
            error: false,
            log: String::new(),
        });

        let actor = Actor {
            store,
            config,
            commands: commands.clone(),
            publish,
            state: WorkoutState::Idle,
            error: false,
            log: String::new(),
            session: None,
            builder: None,
        };
        tokio::spawn(actor.run(command_rx));

        Self { commands, snapshot }
    }

    /// Request a new session. Only valid from `Idle`; otherwise the attempt
    /// is logged and ignored.
    pub fn start(&self) {
        let _ = self.commands.send(Command::Start);
    }

    /// Pause the active session (optimistic, best-effort)
    pub fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
    }

    /// Resume the paused session (optimistic, best-effort)
    pub fn resume(&self) {
        let _ = self.commands.send(Command::Resume);
    }

    /// Run the two-phase shutdown. Only valid from `Active` or `Paused`.
    pub fn end(&self) {
        let _ = self.commands.send(Command::End);
    }

    /// Clear the accumulated log text. The error flag and state are untouched.
    pub fn reset_log(&self) {
        let _ = self.commands.send(Command::ResetLog);
    }

    /// Subscribe to snapshot updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkoutSnapshot> {
        self.snapshot.clone()
    }

    /// The most recently published snapshot
    #[must_use]
    pub fn snapshot(&self) -> WorkoutSnapshot {
        self.snapshot.borrow().clone()
    }
}

impl Drop for WorkoutController {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

struct Actor {
    store: Arc<dyn HealthStore>,
    config: WorkoutConfiguration,
    commands: mpsc::UnboundedSender<Command>,
    publish: watch::Sender<WorkoutSnapshot>,
    state: WorkoutState,
    error: bool,
    log: String,
    session: Option<Arc<dyn WorkoutSessionHandle>>,
    builder: Option<Arc<dyn WorkoutBuilderHandle>>,
}

impl Actor {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            match command {
                Command::Start => self.handle_start(),
                Command::Stop => self.handle_stop(),
                Command::Resume => self.handle_resume(),
                Command::End => self.handle_end(),
                Command::ResetLog => self.log.clear(),
                Command::Shutdown => break,
                Command::StartPhase(outcome) => self.handle_start_phase(outcome),
                Command::EndPhase(outcome) => self.handle_end_phase(outcome),
                Command::Session(event) => self.handle_session_event(&event),
            }
            self.publish_snapshot();
        }
        debug!("workout controller loop ended");
    }

    fn handle_start(&mut self) {
        if self.state != WorkoutState::Idle {
            self.append_log(&format!("start ignored: session {}", self.state));
            return;
        }

        self.append_log("workout start requested");
        match self.store.create_session(&self.config) {
            Ok(SessionParts {
                session,
                builder,
                events,
            }) => {
                session.start_activity(Utc::now());
                self.spawn_event_forwarder(events);

                let task_builder = Arc::clone(&builder);
                let completions = self.commands.clone();
                tokio::spawn(async move {
                    let outcome = task_builder.begin_collection(Utc::now()).await;
                    let _ = completions.send(Command::StartPhase(outcome));
                });

                self.session = Some(session);
                self.builder = Some(builder);
                self.state = WorkoutState::Starting;
            }
            Err(err) => {
                warn!(error = %err, "workout session construction failed");
                self.error = true;
                self.state = WorkoutState::Failed;
                self.append_log("workout start failed");
                self.append_log(&format!("error: {err}"));
            }
        }
    }

    fn handle_start_phase(&mut self, outcome: StoreResult<()>) {
        if self.state != WorkoutState::Starting {
            debug!(state = %self.state, "stale begin-collection completion ignored");
            return;
        }
        match outcome {
            Ok(()) => {
                self.state = WorkoutState::Active;
                self.append_log("workout start succeeded");
            }
            Err(err) => {
                warn!(error = %err, "begin-collection failed");
                self.error = true;
                self.append_log("workout start failed");
                self.append_log(&format!("error: {err}"));
                self.state = WorkoutState::Failed;
                self.release_handles();
            }
        }
    }

    fn handle_stop(&mut self) {
        if self.state != WorkoutState::Active {
            self.append_log(&format!("pause ignored: session {}", self.state));
            return;
        }
        self.append_log("paused");
        self.state = WorkoutState::Paused;
        if let Some(session) = &self.session {
            session.pause();
        }
    }

    fn handle_resume(&mut self) {
        if self.state != WorkoutState::Paused {
            self.append_log(&format!("resume ignored: session {}", self.state));
            return;
        }
        self.append_log("resumed");
        self.state = WorkoutState::Active;
        if let Some(session) = &self.session {
            session.resume();
        }
    }

    fn handle_end(&mut self) {
        if !self.state.can_end() {
            self.append_log(&format!("end ignored: session {}", self.state));
            return;
        }

        self.append_log("workout end requested");
        self.state = WorkoutState::Ending;
        if let Some(session) = &self.session {
            session.end();
        }
        if let Some(builder) = &self.builder {
            let task_builder = Arc::clone(builder);
            let completions = self.commands.clone();
            tokio::spawn(async move {
                let outcome = match task_builder.end_collection(Utc::now()).await {
                    Ok(()) => task_builder.finish().await,
                    Err(err) => Err(err),
                };
                let _ = completions.send(Command::EndPhase(outcome));
            });
        }
    }

    fn handle_end_phase(&mut self, outcome: StoreResult<WorkoutRecord>) {
        if self.state != WorkoutState::Ending {
            debug!(state = %self.state, "stale end completion ignored");
            return;
        }
        match outcome {
            Ok(record) => {
                info!(workout = %record.id, kilocalories = record.total_active_energy_kcal, "workout finalized");
                self.state = WorkoutState::Ended;
                self.append_log("workout end succeeded");
            }
            Err(err) => {
                warn!(error = %err, "workout shutdown failed");
                self.error = true;
                self.append_log("workout end failed");
                self.append_log(&format!("error: {err}"));
                self.state = WorkoutState::Failed;
            }
        }
        self.release_handles();
    }

    fn handle_session_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::StateChanged { from, to } => {
                self.append_log(&format!("session state changed: {from} -> {to}"));
            }
            SessionEvent::DataCollected { data_type } => {
                self.append_log(&format!("session collected {data_type}"));
            }
            SessionEvent::SessionError { details } => {
                self.append_log(&format!("session error: {details}"));
            }
        }
    }

    fn spawn_event_forwarder(&self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        let commands = self.commands.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if commands.send(Command::Session(event)).is_err() {
                    break;
                }
            }
        });
    }

    fn release_handles(&mut self) {
        self.session = None;
        self.builder = None;
    }

    fn append_log(&mut self, line: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        let _ = writeln!(self.log, "[{timestamp}] {line}");
    }

    fn publish_snapshot(&self) {
        let _ = self.publish.send_replace(WorkoutSnapshot {
            state: self.state,
            error: self.error,
            log: self.log.clone(),
        });
    }
}
