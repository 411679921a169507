use std::sync::Arc;

use log::debug;
use payload::{BodyCycle, ModelType, Payload, PayloadBuilder, RequestBody};

use crate::{config::LoadConfig, error::TransportErr, transport::Transport};

/// The only endpoint the load test exercises.
pub const PREDICT_PATH: &str = "/predict";

/// Outcome counters of a single simulated user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskMetrics {
    pub ticks: u64,
    pub failures: u64,
}

/// Per-user prediction task: builds the bodies once, then posts them in
/// round-robin order, one per tick.
#[derive(Debug)]
pub struct PredictTask {
    model_type: ModelType,
    cycle: BodyCycle<Arc<RequestBody>>,
    metrics: TaskMetrics,
}

impl PredictTask {
    /// Builds the bodies for the configured model and positions the cycle at
    /// the first one.
    ///
    /// # Arguments
    /// * `config` - The run configuration.
    ///
    /// # Returns
    /// A task ready to tick.
    ///
    /// # Errors
    /// A configuration or resource `PayloadErr`. The user must not send any
    /// request when this fails.
    pub fn start(config: &LoadConfig) -> payload::Result<Self> {
        let payload = PayloadBuilder::new(&config.resources, config.mode).build(&config.model)?;
        Self::from_payload(payload)
    }

    pub fn from_payload(payload: Payload) -> payload::Result<Self> {
        let bodies = payload.bodies.into_iter().map(Arc::new).collect();
        Ok(Self {
            model_type: payload.model_type,
            cycle: BodyCycle::new(bodies)?,
            metrics: TaskMetrics::default(),
        })
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// Number of distinct bodies this task cycles through.
    pub fn len(&self) -> usize {
        self.cycle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycle.is_empty()
    }

    pub fn metrics(&self) -> &TaskMetrics {
        &self.metrics
    }

    /// Takes the next body of the cycle.
    pub fn draw(&mut self) -> Arc<RequestBody> {
        Arc::clone(self.cycle.next())
    }

    /// Posts one body to the prediction endpoint.
    pub async fn predict<T: Transport>(
        transport: &mut T,
        body: &RequestBody,
    ) -> Result<u16, TransportErr> {
        transport.send_json(PREDICT_PATH, body).await
    }

    /// Counts the outcome of a tick.
    pub fn record(&mut self, outcome: &Result<u16, TransportErr>) {
        self.metrics.ticks += 1;
        if let Err(e) = outcome {
            self.metrics.failures += 1;
            debug!("predict request failed: {e}");
        }
    }

    /// Draws the next body and posts it.
    ///
    /// A failed request only affects this tick, the cycle has already moved on
    /// and the next tick sends the following body.
    pub async fn tick<T: Transport>(&mut self, transport: &mut T) -> Result<u16, TransportErr> {
        let body = self.draw();
        let outcome = Self::predict(transport, &body).await;
        self.record(&outcome);
        outcome
    }
}
