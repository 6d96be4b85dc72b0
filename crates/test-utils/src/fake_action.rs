use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use actionloop::errors::{ActuatorError, Result};
use actionloop::exec::ActionBackend;

/// A fake action that:
/// - records every request it receives
/// - answers with the request uppercased
/// - fails (and reports itself exited) once `fail_after` requests were served.
pub struct FakeAction {
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_after: Option<usize>,
    exited: bool,
    stop_calls: usize,
}

impl FakeAction {
    pub fn new(requests: Arc<Mutex<Vec<Vec<u8>>>>) -> Self {
        Self {
            requests,
            fail_after: None,
            exited: false,
            stop_calls: 0,
        }
    }

    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls
    }
}

impl ActionBackend for FakeAction {
    fn interact<'a>(
        &'a mut self,
        request: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let served = {
                let mut guard = self.requests.lock().unwrap();
                guard.push(request.to_vec());
                guard.len()
            };

            if self.fail_after.is_some_and(|n| served > n) {
                self.exited = true;
                return Err(ActuatorError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "fake action exited",
                )));
            }

            Ok(request.to_ascii_uppercase())
        })
    }

    fn exited(&self) -> bool {
        self.exited
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
    }
}
