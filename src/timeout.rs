//! Timeout guard for asynchronous test bodies.
//!
//! A [`TimeoutGuard`] is a single-shot timer that fires after a fixed duration.
//! The engine races a body's completion channel against it. Whichever side
//! settles first decides the outcome; the other side is dropped.
//!
//! A guard can [watch](TimeoutGuard::watching) a channel of new time limits.
//! A new limit moves the deadline to `start + limit`, so a limit that already
//! passed fires right away.
//!
//! Cancellation is logical only. When the guard wins, the engine stops waiting
//! for the body, but the thread driving the body keeps running until the body
//! finishes on its own. Anything it reports afterwards is discarded.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvError, select};

/// The error recorded when a test exceeds its time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("test exceeded its time limit of {}ms", .timeout.as_millis())]
pub struct TestTimeoutError {
    pub timeout: Duration,
}

impl TestTimeoutError {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[derive(Debug)]
pub struct TimeoutGuard {
    timeout: Duration,
    started: Instant,
    fired: Receiver<Instant>,
    changes: Receiver<Duration>,
}

enum Step<T> {
    Settled(Result<T, RecvError>),
    Fired,
    Changed(Result<Duration, RecvError>),
}

impl TimeoutGuard {
    /// Arm a guard that fires `timeout` from now.
    pub fn start(timeout: Duration) -> Self {
        Self {
            timeout,
            started: Instant::now(),
            fired: crossbeam_channel::after(timeout),
            changes: crossbeam_channel::never(),
        }
    }

    /// Move the deadline whenever a new time limit arrives on `changes`.
    pub fn watching(self, changes: Receiver<Duration>) -> Self {
        Self { changes, ..self }
    }

    fn rearm(&mut self, timeout: Duration) {
        tracing::debug!(timeout_ms = timeout.as_millis() as u64, "timeout guard re-armed");
        self.timeout = timeout;
        self.fired = crossbeam_channel::at(self.started + timeout);
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Block until the guard fires and return the timeout error.
    pub fn wait(self) -> TestTimeoutError {
        let _ = self.fired.recv();
        TestTimeoutError::new(self.timeout)
    }

    /// Wait for the first value on `settled` or for the guard, whichever comes first.
    ///
    /// A disconnected `settled` channel counts as settled and is returned as
    /// `Ok(Err(RecvError))`, so callers can tell a crashed producer apart from a timeout.
    pub fn race<T>(
        mut self,
        settled: &Receiver<T>,
    ) -> Result<Result<T, RecvError>, TestTimeoutError> {
        loop {
            let step = select! {
                recv(settled) -> value => Step::Settled(value),
                recv(self.fired) -> _ => Step::Fired,
                recv(self.changes) -> timeout => Step::Changed(timeout),
            };

            match step {
                Step::Settled(value) => return Ok(value),
                Step::Fired => {
                    tracing::debug!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        elapsed_ms = self.started.elapsed().as_millis() as u64,
                        "timeout guard fired"
                    );
                    return Err(TestTimeoutError::new(self.timeout));
                }
                Step::Changed(Ok(timeout)) => {
                    // Only the latest of several queued limits counts.
                    let timeout = self.changes.try_iter().last().unwrap_or(timeout);
                    self.rearm(timeout);
                }
                Step::Changed(Err(RecvError)) => self.changes = crossbeam_channel::never(),
            }
        }
    }
}
