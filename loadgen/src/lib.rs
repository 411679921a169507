pub mod config;
pub mod error;
pub mod scenario;
pub mod task;
pub mod transport;

pub use config::LoadConfig;
pub use error::{LoadgenErr, Result, TransportErr};
pub use scenario::{UserState, vision_model};
pub use task::{PREDICT_PATH, PredictTask, TaskMetrics};
pub use transport::Transport;
