//! Request payloads for load testing vision prediction services.
//!
//! A model identifier is resolved to a [`ModelType`], sample assets are loaded
//! and base64 encoded, and the resulting [`RequestBody`] values are handed out
//! in round-robin order by a [`BodyCycle`].

pub mod asset;
pub mod body;
pub mod builder;
pub mod cycle;
pub mod error;
pub mod model;

pub use asset::AssetRecord;
pub use body::{InlineData, Media, RequestBody};
pub use builder::{BodyMode, Payload, PayloadBuilder, ResourceConfig};
pub use cycle::BodyCycle;
pub use error::{ErrKind, PayloadErr, Result};
pub use model::{FeatureSpec, FileTypeKey, MAX_RESULTS, ModelType};
