use goose::prelude::GooseUser;
use payload::RequestBody;

use crate::error::TransportErr;

/// Issues a JSON POST and reports the transport-level outcome.
///
/// Implementations never inspect the response body, only whether the request
/// went through and the status the service answered with.
#[allow(unused)]
#[trait_variant::make(Transport: Send)]
pub trait TransportTemplate {
    /// Posts `body` as JSON to `path`, relative to the target base URL.
    ///
    /// # Arguments
    /// * `path` - Relative request path, e.g. `/predict`.
    /// * `body` - The payload to serialize.
    ///
    /// # Returns
    /// The success status code, or a `TransportErr` for failed requests and
    /// non-success statuses.
    async fn send_json(&mut self, path: &str, body: &RequestBody) -> Result<u16, TransportErr>;
}

impl Transport for GooseUser {
    async fn send_json(&mut self, path: &str, body: &RequestBody) -> Result<u16, TransportErr> {
        // goose records the request in its own metrics before handing it back.
        let goose = self
            .post_json(path, body)
            .await
            .map_err(|e| TransportErr::Harness(e.to_string()))?;

        match goose.response {
            Ok(response) if response.status().is_success() => Ok(response.status().as_u16()),
            Ok(response) => Err(TransportErr::Status(response.status().as_u16())),
            Err(e) => Err(TransportErr::Request(e.to_string())),
        }
    }
}
