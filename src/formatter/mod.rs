//! Reporters for kispec.
//!
//! The engine does not print anything. Formatters turn the dispatched events
//! into output: [`install`] subscribes a [`TestFormatter`] to a [`Dispatcher`]
//! and routes every event to the matching `fmt_*` method.
//!
//! A formatter that fails to write does not stop the run. Its errors are
//! collected, tagged with the [`FormatError`] stage they happened in, and can
//! be inspected through the returned [`InstalledFormatter`].

use std::{
    fmt::{Debug, Display},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    event::{Dispatcher, Event},
    group::{Group, GroupMeta},
    test::Test,
};

pub mod common;
pub mod no;
pub mod pretty;

/// The formatter stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatError {
    DescribeStart,
    DescribeSkipped,
    TestSkipped,
    TestFinished,
    RunFinished,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FormatError::DescribeStart => "fmt_describe_start",
            FormatError::DescribeSkipped => "fmt_describe_skipped",
            FormatError::TestSkipped => "fmt_test_skipped",
            FormatError::TestFinished => "fmt_test_finished",
            FormatError::RunFinished => "fmt_run_finished",
        })
    }
}

/// Turns run events into output.
///
/// Every method defaults to doing nothing.
pub trait TestFormatter {
    type Error;

    fn fmt_describe_start(
        &mut self,
        describe_stack: &[GroupMeta],
        group: &Group,
    ) -> Result<(), Self::Error> {
        let _ = (describe_stack, group);
        Ok(())
    }

    fn fmt_describe_skipped(
        &mut self,
        describe_stack: &[GroupMeta],
        group: &Group,
    ) -> Result<(), Self::Error> {
        let _ = (describe_stack, group);
        Ok(())
    }

    fn fmt_test_skipped(&mut self, test: &Test) -> Result<(), Self::Error> {
        let _ = test;
        Ok(())
    }

    fn fmt_test_finished(&mut self, test: &Test) -> Result<(), Self::Error> {
        let _ = test;
        Ok(())
    }

    fn fmt_run_finished(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct Installed<F: TestFormatter> {
    formatter: F,
    fmt_errors: Vec<(FormatError, F::Error)>,
}

impl<F: TestFormatter> Installed<F> {
    fn handle(&mut self, event: &Event<'_>) {
        let (stage, result) = match event {
            Event::BeginningDescribe {
                describe_stack,
                group,
            } => (
                FormatError::DescribeStart,
                self.formatter.fmt_describe_start(describe_stack, group),
            ),
            Event::SkippingDescribe {
                describe_stack,
                group,
            } => (
                FormatError::DescribeSkipped,
                self.formatter.fmt_describe_skipped(describe_stack, group),
            ),
            Event::SkippingTest(test) => (
                FormatError::TestSkipped,
                self.formatter.fmt_test_skipped(test),
            ),
            Event::FinishedTest(test) => (
                FormatError::TestFinished,
                self.formatter.fmt_test_finished(test),
            ),
            Event::FinishedTestRun => (FormatError::RunFinished, self.formatter.fmt_run_finished()),
        };

        if let Err(err) = result {
            self.fmt_errors.push((stage, err));
        }
    }
}

/// Handle to a formatter subscribed with [`install`].
pub struct InstalledFormatter<F: TestFormatter> {
    inner: Arc<Mutex<Installed<F>>>,
}

impl<F: TestFormatter> Debug for InstalledFormatter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstalledFormatter")
            .field("fmt_errors", &self.lock().fmt_errors.len())
            .finish_non_exhaustive()
    }
}

impl<F: TestFormatter> InstalledFormatter<F> {
    fn lock(&self) -> MutexGuard<'_, Installed<F>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Access the formatter, for example to read back a buffer it writes to.
    pub fn with<R>(&self, f: impl FnOnce(&mut F) -> R) -> R {
        f(&mut self.lock().formatter)
    }

    /// Take the errors collected so far.
    pub fn take_errors(&self) -> Vec<(FormatError, F::Error)> {
        std::mem::take(&mut self.lock().fmt_errors)
    }
}

/// Subscribe `formatter` to every event of `dispatcher`.
pub fn install<F>(formatter: F, dispatcher: &mut Dispatcher) -> InstalledFormatter<F>
where
    F: TestFormatter + Send + 'static,
    F::Error: Send + 'static,
{
    let inner = Arc::new(Mutex::new(Installed {
        formatter,
        fmt_errors: Vec::new(),
    }));

    let handler = Arc::clone(&inner);
    dispatcher.listen_all(move |event| {
        handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handle(event)
    });

    InstalledFormatter { inner }
}
