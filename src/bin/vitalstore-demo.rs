// ABOUTME: Demo binary driving the vitalstore components against a seeded synthetic store
// ABOUTME: Runs authorization, previous-day reading, and a scripted workout session from the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vitalstore contributors

//! Demonstration surface for the vitalstore crate.
//!
//! Usage:
//! ```bash
//! # Full tour: authorization, previous-day reading, scripted workout
//! vitalstore-demo
//!
//! # Individual steps
//! vitalstore-demo auth
//! vitalstore-demo read
//! vitalstore-demo workout
//!
//! # Phone profile (also reads characteristics), custom seed
//! vitalstore-demo --profile phone --seed 7 read
//!
//! # Debug logging
//! vitalstore-demo -v workout
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use vitalstore::authorization::AuthorizationGateway;
use vitalstore::config::DemoConfig;
use vitalstore::logging::LoggingConfig;
use vitalstore::models::{BiologicalSex, BloodType, WorkoutConfiguration, WorkoutState};
use vitalstore::readings::{ReaderOptions, SampleReader};
use vitalstore::store::synthetic::SyntheticStore;
use vitalstore::store::HealthStore;
use vitalstore::workout::{WorkoutController, WorkoutSnapshot};

#[derive(Parser)]
#[command(
    name = "vitalstore-demo",
    about = "vitalstore demonstration CLI",
    long_about = "Drives the authorization gateway, sample reader, and workout session \
                  controller against an in-memory synthetic health store."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Permission profile (phone or watch); overrides VITALSTORE_PROFILE
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Synthetic-data seed; overrides VITALSTORE_SEED
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Request health-data authorization
    Auth,
    /// Read yesterday's active-energy aggregate (phone profile also reads characteristics)
    Read,
    /// Run a scripted workout session: start, pause, resume, end
    Workout,
    /// Run the full tour: auth, read, workout
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = DemoConfig::from_env();
    if let Some(profile) = &cli.profile {
        config.profile = profile.parse()?;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let store = seeded_store(&config)?;

    match cli.command.unwrap_or(Command::All) {
        Command::Auth => run_auth(&store, config).await?,
        Command::Read => run_read(&store, config).await,
        Command::Workout => run_workout(&store).await?,
        Command::All => {
            run_auth(&store, config).await?;
            run_read(&store, config).await;
            run_workout(&store).await?;
        }
    }

    Ok(())
}

/// Build the synthetic store the demo runs against: seeded previous-day
/// energy samples plus a full set of characteristics.
fn seeded_store(config: &DemoConfig) -> Result<Arc<SyntheticStore>> {
    let store = Arc::new(SyntheticStore::new());
    store.seed_previous_day_energy(config.seed, config.sample_count)?;
    store.set_biological_sex(Some(BiologicalSex::Female))?;
    store.set_date_of_birth(NaiveDate::from_ymd_opt(1990, 4, 12))?;
    store.set_blood_type(Some(BloodType::OPositive))?;
    Ok(store)
}

async fn run_auth(store: &Arc<SyntheticStore>, config: DemoConfig) -> Result<()> {
    let health_store: Arc<dyn HealthStore> = Arc::clone(store) as Arc<dyn HealthStore>;
    let gateway = AuthorizationGateway::new(health_store, config.profile.permissions());
    let outcome = gateway.request().await?;
    println!("authorization: {outcome:?}");
    Ok(())
}

async fn run_read(store: &Arc<SyntheticStore>, config: DemoConfig) {
    let health_store: Arc<dyn HealthStore> = Arc::clone(store) as Arc<dyn HealthStore>;
    let reader = SampleReader::new(
        health_store,
        ReaderOptions {
            include_characteristics: config.profile.includes_characteristics(),
            ..ReaderOptions::default()
        },
    );

    let reading = reader.refresh().await;
    println!("yesterday's active energy: {:.1} kcal", reading.kilocalories);

    if let Some(characteristics) = reader.characteristics() {
        let profile = characteristics.current();
        println!(
            "characteristics: sex={:?} age={:?} blood={:?}",
            profile.biological_sex, profile.age_years, profile.blood_type
        );
    }
}

async fn run_workout(store: &Arc<SyntheticStore>) -> Result<()> {
    let health_store: Arc<dyn HealthStore> = Arc::clone(store) as Arc<dyn HealthStore>;
    let controller = WorkoutController::new(health_store, WorkoutConfiguration::default());
    let mut snapshots = controller.subscribe();

    controller.start();
    wait_for(&mut snapshots, WorkoutState::Active).await?;

    sleep(Duration::from_millis(1200)).await;
    controller.stop();
    wait_for(&mut snapshots, WorkoutState::Paused).await?;

    controller.resume();
    wait_for(&mut snapshots, WorkoutState::Active).await?;

    sleep(Duration::from_millis(800)).await;
    controller.end();
    let terminal = timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| matches!(s.state, WorkoutState::Ended | WorkoutState::Failed)),
    )
    .await
    .map_err(|_| anyhow!("timed out waiting for the session to finish"))?
    .map(|snapshot| (*snapshot).clone())?;

    println!("workout finished in state: {}", terminal.state);
    println!("--- session log ---");
    print!("{}", terminal.log);

    for record in store.recorded_workouts() {
        println!(
            "recorded workout {}: {} ({:.2} kcal)",
            record.id, record.activity, record.total_active_energy_kcal
        );
    }

    Ok(())
}

async fn wait_for(
    snapshots: &mut watch::Receiver<WorkoutSnapshot>,
    target: WorkoutState,
) -> Result<WorkoutSnapshot> {
    let snapshot = timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.state == target),
    )
    .await
    .map_err(|_| anyhow!("timed out waiting for state {target}"))??;
    Ok((*snapshot).clone())
}
