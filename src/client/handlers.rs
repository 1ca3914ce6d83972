//! Callback-style result delivery.
//!
//! For call sites that prefer success/error callbacks over matching on a
//! `Result`.
//!
//! ```
//! use simfetch::client::{deliver, Callbacks};
//! use simfetch::{ResponseEnvelope, SimFetchError};
//! use std::cell::Cell;
//!
//! let seen = Cell::new(0);
//! let handlers = Callbacks::new(
//!     |response: ResponseEnvelope<u32>| seen.set(response.data),
//!     |_error: SimFetchError| seen.set(u32::MAX),
//! );
//!
//! deliver(Ok(ResponseEnvelope { data: 7, status: 200 }), &handlers);
//! assert_eq!(seen.get(), 7);
//! ```

use crate::error::Result;
use crate::error::SimFetchError;
use crate::types::ResponseEnvelope;

/// Receives the outcome of one request.
pub trait ResponseHandlers<T> {
    /// Called with the decoded response.
    fn on_success(&self, response: ResponseEnvelope<T>);

    /// Called with any error, including cancellation.
    fn on_error(&self, error: SimFetchError);
}

/// [`ResponseHandlers`] built from two closures.
pub struct Callbacks<S, E> {
    on_success: S,
    on_error: E,
}

impl<S, E> Callbacks<S, E> {
    /// Pair a success and an error callback.
    pub fn new(on_success: S, on_error: E) -> Self {
        Self { on_success, on_error }
    }
}

impl<T, S, E> ResponseHandlers<T> for Callbacks<S, E>
where
    S: Fn(ResponseEnvelope<T>),
    E: Fn(SimFetchError),
{
    fn on_success(&self, response: ResponseEnvelope<T>) {
        (self.on_success)(response)
    }

    fn on_error(&self, error: SimFetchError) {
        (self.on_error)(error)
    }
}

/// Route `result` to exactly one of the handler's callbacks.
pub fn deliver<T, H>(result: Result<ResponseEnvelope<T>>, handlers: &H)
where
    H: ResponseHandlers<T> + ?Sized,
{
    match result {
        Ok(response) => handlers.on_success(response),
        Err(error) => handlers.on_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ResponseHandlers<String> for Recorder {
        fn on_success(&self, response: ResponseEnvelope<String>) {
            self.events.lock().push(format!("ok {} {}", response.status, response.data));
        }

        fn on_error(&self, error: SimFetchError) {
            self.events.lock().push(format!("err {}", error));
        }
    }

    #[test]
    fn test_success_goes_to_on_success() {
        let recorder = Recorder::default();
        deliver(
            Ok(ResponseEnvelope {
                data: "item1".to_string(),
                status: 200,
            }),
            &recorder,
        );
        assert_eq!(*recorder.events.lock(), vec!["ok 200 item1".to_string()]);
    }

    #[test]
    fn test_error_goes_to_on_error() {
        let recorder = Recorder::default();
        deliver(Err(SimFetchError::from_status(404)), &recorder);
        assert_eq!(
            *recorder.events.lock(),
            vec!["err HTTP error! Status: 404".to_string()]
        );
    }
}
