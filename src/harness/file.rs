use std::{borrow::Cow, fmt::Debug};

use crate::builder::Suite;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("{0}")]
    Message(String),

    #[error("panicked while loading: {0}")]
    Panicked(String),
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// A unit of test declarations.
///
/// Loading a file runs its declarations against the suite of the current run.
/// Files are loaded one after another, in the order they were handed to
/// [`run`](crate::run), so declarations of one file never interleave with
/// declarations of another.
pub trait TestFile {
    fn name(&self) -> &str;

    fn load(&self, suite: &mut Suite) -> Result<(), LoadError>;
}

impl<T: TestFile + ?Sized> TestFile for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self, suite: &mut Suite) -> Result<(), LoadError> {
        (**self).load(suite)
    }
}

impl<T: TestFile + ?Sized> TestFile for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self, suite: &mut Suite) -> Result<(), LoadError> {
        (**self).load(suite)
    }
}

/// A [`TestFile`] backed by a closure. See [`test_file`].
pub struct FnTestFile<F> {
    name: Cow<'static, str>,
    load: F,
}

impl<F> Debug for FnTestFile<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTestFile")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F: Fn(&mut Suite)> TestFile for FnTestFile<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, suite: &mut Suite) -> Result<(), LoadError> {
        (self.load)(suite);
        Ok(())
    }
}

/// Declare a test file from a closure.
///
/// ```
/// use kispec::test_file;
///
/// let calc = test_file("calc", |s| {
///     s.describe("calc", |s| {
///         s.it("adds", |ctx| {
///             ctx.expect(1 + 1).to_be(2);
///         });
///     });
/// });
/// ```
pub fn test_file<F>(name: impl Into<Cow<'static, str>>, load: F) -> FnTestFile<F>
where
    F: Fn(&mut Suite),
{
    FnTestFile {
        name: name.into(),
        load,
    }
}
