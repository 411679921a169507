use std::{sync::Arc, time::Duration};

use goose::prelude::*;
use log::{error, info, warn};
use tokio::time;

use crate::{config::LoadConfig, task::PredictTask};

/// How long an aborted user idles per tick instead of sending requests.
///
/// goose marks every transaction that returns `Ok` as a success, so each idle
/// tick still shows up as a `predict` entry of roughly this duration in the
/// transaction table. Those entries carry no request: the request table only
/// counts what reached the service.
pub const ABORTED_IDLE: Duration = Duration::from_secs(1);

/// Per-user state kept in goose session data.
#[derive(Debug)]
pub enum UserState {
    Ready(PredictTask),
    /// Start-up failed, the user sends nothing.
    Aborted,
}

/// Builds the goose scenario: an on-start `setup`, `predict` ticks and an
/// on-stop `teardown`.
///
/// # Arguments
/// * `config` - The run configuration shared by every user.
///
/// # Returns
/// The scenario to register on a `GooseAttack`.
///
/// # Errors
/// Returns a `GooseError` if goose rejects the transaction weights.
pub fn vision_model(config: Arc<LoadConfig>) -> Result<Scenario, GooseError> {
    Ok(scenario!("VisionModel")
        .register_transaction(setup_transaction(config))
        .register_transaction(transaction!(predict).set_name("predict").set_weight(1)?)
        .register_transaction(transaction!(teardown).set_name("teardown").set_on_stop()))
}

fn setup_transaction(config: Arc<LoadConfig>) -> Transaction {
    let func: TransactionFunction = Arc::new(move |user| {
        let config = Arc::clone(&config);
        Box::pin(async move { setup(user, config).await })
    });

    Transaction::new(func).set_name("setup").set_on_start()
}

/// Builds the user's `PredictTask` and stores it as session data.
///
/// A failed start-up is logged and leaves the user `Aborted`, the transaction
/// itself still succeeds so goose keeps the user around until shutdown.
pub async fn setup(user: &mut GooseUser, config: Arc<LoadConfig>) -> TransactionResult {
    let user_id = user.weighted_users_index;
    info!("user {user_id} targeting {}", user.base_url);

    // Sample loading is blocking file I/O.
    let started = tokio::task::spawn_blocking(move || PredictTask::start(&config)).await;

    let state = match started {
        Ok(Ok(task)) => {
            info!(
                "user {user_id} ready: {} bodies for {}",
                task.len(),
                task.model_type()
            );
            UserState::Ready(task)
        }
        Ok(Err(e)) => {
            error!("user {user_id} aborted: {e}");
            UserState::Aborted
        }
        Err(e) => {
            error!("user {user_id} aborted: start-up task failed: {e}");
            UserState::Aborted
        }
    };

    user.set_session_data(state);
    Ok(())
}

/// Posts the next body of a `Ready` user, idles an `Aborted` one.
pub async fn predict(user: &mut GooseUser) -> TransactionResult {
    let body = match user.get_session_data_mut::<UserState>() {
        Some(UserState::Ready(task)) => task.draw(),
        _ => {
            time::sleep(ABORTED_IDLE).await;
            return Ok(());
        }
    };

    let outcome = PredictTask::predict(user, &body).await;
    if let Some(UserState::Ready(task)) = user.get_session_data_mut::<UserState>() {
        task.record(&outcome);
    }

    Ok(())
}

/// Logs the per-user outcome counters when goose stops the user.
pub async fn teardown(user: &mut GooseUser) -> TransactionResult {
    let user_id = user.weighted_users_index;
    match user.get_session_data::<UserState>() {
        Some(UserState::Ready(task)) => {
            let metrics = task.metrics();
            info!(
                "user {user_id} stopped: {} predict requests, {} failed",
                metrics.ticks, metrics.failures
            );
        }
        Some(UserState::Aborted) => {
            warn!("user {user_id} stopped: aborted at start-up, its predict entries are idle ticks")
        }
        None => warn!("user {user_id} stopped before start-up"),
    }

    Ok(())
}
