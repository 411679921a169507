use crate::{
    body::RequestBody,
    error::{PayloadErr, Result},
};

/// Round-robin iterator over a fixed, non-empty sequence of request bodies.
///
/// The sequence never changes after construction; only the cursor moves. Every
/// simulated user owns its own cycle, so draws never contend.
#[derive(Debug, Clone)]
pub struct BodyCycle<T = RequestBody> {
    bodies: Vec<T>,
    cursor: usize,
}

impl<T> BodyCycle<T> {
    /// Creates a new `BodyCycle` positioned at the first body.
    ///
    /// # Arguments
    /// * `bodies` - The bodies to cycle through, in draw order.
    ///
    /// # Errors
    /// `PayloadErr::EmptyBodySet` if `bodies` is empty.
    pub fn new(bodies: Vec<T>) -> Result<Self> {
        if bodies.is_empty() {
            return Err(PayloadErr::EmptyBodySet);
        }

        Ok(Self { bodies, cursor: 0 })
    }

    /// Returns the body under the cursor and moves the cursor one step forward,
    /// wrapping after the last body.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &T {
        let idx = self.cursor;
        self.cursor = (idx + 1) % self.bodies.len();
        &self.bodies[idx]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false, a cycle cannot be built empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Index of the body the next draw returns.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
