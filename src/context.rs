//! The handle a running test reports into.
//!
//! Hooks and bodies receive a [`TestContext`] instead of reaching for a global
//! "current test". Matchers record their failures through it and keep going.
//!
//! Changing the time limit with [`TestContext::times_out_after`] is announced on
//! a channel, so a timeout guard that is already armed can pick it up.
//!
//! When the engine finishes a test it seals the context. A body that was
//! abandoned after a timeout may still hold a clone; anything it records after
//! sealing is dropped so it can never change a finished test's result.

use std::{
    borrow::Cow,
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender};

use crate::{expect::Expectation, outcome::TestError};

#[derive(Debug, Clone)]
pub struct TestContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    name: Cow<'static, str>,
    state: Mutex<State>,
    timeout_tx: Sender<Duration>,
    timeout_rx: Receiver<Duration>,
}

#[derive(Debug)]
struct State {
    errors: Vec<TestError>,
    timeout: Duration,
    sealed: bool,
}

impl TestContext {
    pub(crate) fn new(name: Cow<'static, str>, timeout: Duration) -> Self {
        let (timeout_tx, timeout_rx) = crossbeam_channel::unbounded();
        Self {
            inner: Arc::new(Inner {
                name,
                timeout_tx,
                timeout_rx,
                state: Mutex::new(State {
                    errors: Vec::new(),
                    timeout,
                    sealed: false,
                }),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Name of the running test.
    pub fn test_name(&self) -> &str {
        &self.inner.name
    }

    /// Start an expectation on `actual`.
    pub fn expect<T>(&self, actual: T) -> Expectation<'_, T> {
        Expectation::new(self, actual)
    }

    /// Record a failure without stopping the test.
    pub fn fail(&self, message: impl Into<String>) {
        self.record(TestError::Failed(message.into()));
    }

    /// Change the time limit of the running test.
    ///
    /// The limit counts from the moment the body started, also when it is
    /// changed from inside a running asynchronous body. Synchronous bodies are
    /// never raced, so for them only the recorded value changes.
    pub fn times_out_after(&self, timeout: Duration) {
        self.state().timeout = timeout;
        // The receiver lives as long as the context.
        let _ = self.inner.timeout_tx.send(timeout);
    }

    /// Every time limit set through [`times_out_after`](Self::times_out_after), in order.
    pub(crate) fn timeout_changes(&self) -> Receiver<Duration> {
        self.inner.timeout_rx.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.state().timeout
    }

    pub fn has_errors(&self) -> bool {
        !self.state().errors.is_empty()
    }

    pub fn record(&self, error: impl Into<TestError>) {
        let error = error.into();
        let mut state = self.state();
        if state.sealed {
            tracing::trace!(test = %self.inner.name, %error, "discarding failure reported after the test finished");
            return;
        }
        state.errors.push(error);
    }

    /// Close the context and take every failure recorded so far.
    pub(crate) fn seal(&self) -> Vec<TestError> {
        let mut state = self.state();
        state.sealed = true;
        mem::take(&mut state.errors)
    }
}
