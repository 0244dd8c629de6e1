use std::fmt::Display;

use crate::{expect::ExpectationError, timeout::TestTimeoutError};

/// The part of a test's lifecycle an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    BeforeEach,
    Body,
    AfterEach,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::BeforeEach => "beforeEach",
            Phase::Body => "test body",
            Phase::AfterEach => "afterEach",
        })
    }
}

/// A failure captured onto a [`Test`](crate::test::Test).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TestError {
    /// A matcher did not match. The test kept running.
    #[error(transparent)]
    Expectation(#[from] ExpectationError),

    /// A hook or body panicked, which stops the rest of the test.
    #[error("{phase} panicked: {message}")]
    Panicked { phase: Phase, message: String },

    /// A hook or body returned an error, which stops the rest of the test.
    #[error("{phase} returned an error: {message}")]
    Returned { phase: Phase, message: String },

    /// The body did not settle in time.
    #[error(transparent)]
    TimedOut(#[from] TestTimeoutError),

    /// Recorded through [`TestContext::fail`](crate::context::TestContext::fail).
    #[error("{0}")]
    Failed(String),
}

impl TestError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TestError::TimedOut(_))
    }

    pub fn is_expectation(&self) -> bool {
        matches!(self, TestError::Expectation(_))
    }
}
