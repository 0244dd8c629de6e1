//! Declarative construction of the block tree.
//!
//! A [`Suite`] is what test files talk to. It keeps the root group and a stack
//! of the groups still under construction above it. `describe` pushes a fresh
//! group builder, runs the body against the suite and then pops the finished
//! group into its parent's children. `it` appends a test to the innermost open
//! group, or to the root when none is open.
//!
//! Construction errors are latched. After the first error every further call
//! on the suite is ignored, which halts the rest of the file that caused it.
//! The loader takes the error out with [`Suite::take_error`].

use std::{borrow::Cow, future::Future};

use crate::{
    context::TestContext,
    group::{Block, Extension, Group, GroupMeta, Options},
    shared::{SharedExample, SharedExamples},
    test::{DEFAULT_TIMEOUT, Hook, Test, TestBody, TestMeta, TestResult},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("shared example `{0}` was never registered")]
    SharedExampleNotFound(String),

    #[error("`{hook}` must be called inside a `describe` block")]
    HookOutsideGroup { hook: &'static str },
}

/// A group while its body is still running.
#[derive(Debug)]
struct GroupBuilder {
    group: Group,
}

impl GroupBuilder {
    fn new(meta: GroupMeta) -> Self {
        Self {
            group: Group::new(meta),
        }
    }

    fn finish(self) -> Group {
        self.group
    }
}

#[derive(Debug)]
pub struct Suite {
    root: GroupBuilder,
    open: Vec<GroupBuilder>,
    shared: SharedExamples,
    error: Option<BuildError>,
}

impl Default for Suite {
    fn default() -> Self {
        Self {
            root: GroupBuilder {
                group: Group::root(),
            },
            open: Vec::new(),
            shared: SharedExamples::default(),
            error: None,
        }
    }
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut GroupBuilder {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    /// How many groups enclose the next block, not counting the root.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn latch(&mut self, error: BuildError) {
        tracing::debug!(%error, "test tree construction failed");
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn error(&self) -> Option<&BuildError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<BuildError> {
        self.error.take()
    }

    fn parse_describe<F>(
        &mut self,
        name: Cow<'static, str>,
        options: Options,
        shared_example: Option<Cow<'static, str>>,
        body: Option<F>,
    ) where
        F: FnOnce(&mut Suite),
    {
        if self.error.is_some() {
            return;
        }

        self.open.push(GroupBuilder::new(GroupMeta {
            name,
            skip: body.is_none() || options.skip,
            focus: options.focus,
            tags: options.tags,
            shared_example,
        }));
        if let Some(body) = body {
            body(self);
        }

        if let Some(finished) = self.open.pop() {
            self.current()
                .group
                .children
                .push(Block::Group(finished.finish()));
        }
    }

    fn parse_it(&mut self, name: Cow<'static, str>, options: Options, body: Option<TestBody>) {
        if self.error.is_some() {
            return;
        }

        let test = Test::new(
            TestMeta {
                name,
                skip: options.skip,
                focus: options.focus,
                tags: options.tags,
                timeout: options.timeout.unwrap_or(DEFAULT_TIMEOUT),
            },
            body,
        );
        self.current().group.children.push(Block::Test(test));
    }

    fn describe_ext<F>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        options: Options,
        extension: Extension,
        body: F,
    ) where
        F: FnOnce(&mut Suite),
    {
        self.parse_describe(name.into(), options.extend_with(extension), None, Some(body));
    }

    pub fn describe<F>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: FnOnce(&mut Suite),
    {
        self.describe_ext(name, Options::default(), Extension::None, body);
    }

    pub fn describe_with<F>(&mut self, name: impl Into<Cow<'static, str>>, options: Options, body: F)
    where
        F: FnOnce(&mut Suite),
    {
        self.describe_ext(name, options, Extension::None, body);
    }

    pub fn describe_only<F>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: FnOnce(&mut Suite),
    {
        self.describe_ext(name, Options::default(), Extension::Only, body);
    }

    pub fn describe_skip<F>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: FnOnce(&mut Suite),
    {
        self.describe_ext(name, Options::default(), Extension::Skip, body);
    }

    /// Declare a group without a body. It is skipped.
    pub fn describe_pending(&mut self, name: impl Into<Cow<'static, str>>) {
        self.parse_describe::<fn(&mut Suite)>(name.into(), Options::default(), None, None);
    }

    fn it_ext<F, T>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        options: Options,
        extension: Extension,
        body: F,
    ) where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        self.parse_it(
            name.into(),
            options.extend_with(extension),
            Some(TestBody::from_fn(body)),
        );
    }

    pub fn it<F, T>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        self.it_ext(name, Options::default(), Extension::None, body);
    }

    pub fn it_with<F, T>(&mut self, name: impl Into<Cow<'static, str>>, options: Options, body: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        self.it_ext(name, options, Extension::None, body);
    }

    pub fn it_only<F, T>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        self.it_ext(name, Options::default(), Extension::Only, body);
    }

    pub fn it_skip<F, T>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        self.it_ext(name, Options::default(), Extension::Skip, body);
    }

    /// Declare a test without a body. It is reported as skipped.
    pub fn it_pending(&mut self, name: impl Into<Cow<'static, str>>) {
        self.parse_it(name.into(), Options::default(), None);
    }

    fn it_async_ext<F, Fut, T>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        options: Options,
        extension: Extension,
        body: F,
    ) where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Into<TestResult> + 'static,
    {
        self.parse_it(
            name.into(),
            options.extend_with(extension),
            Some(TestBody::from_async_fn(body)),
        );
    }

    /// Declare a test whose body is a future, raced against the test's timeout.
    pub fn it_async<F, Fut, T>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Into<TestResult> + 'static,
    {
        self.it_async_ext(name, Options::default(), Extension::None, body);
    }

    pub fn it_async_with<F, Fut, T>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        options: Options,
        body: F,
    ) where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Into<TestResult> + 'static,
    {
        self.it_async_ext(name, options, Extension::None, body);
    }

    pub fn it_async_only<F, Fut, T>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Into<TestResult> + 'static,
    {
        self.it_async_ext(name, Options::default(), Extension::Only, body);
    }

    pub fn it_async_skip<F, Fut, T>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Into<TestResult> + 'static,
    {
        self.it_async_ext(name, Options::default(), Extension::Skip, body);
    }

    fn push_hook(&mut self, hook: &'static str, f: impl FnOnce(&mut Group)) {
        if self.error.is_some() {
            return;
        }
        if self.depth() == 0 {
            self.latch(BuildError::HookOutsideGroup { hook });
            return;
        }
        f(&mut self.current().group);
    }

    /// Run `hook` before every test in the current group and its descendants.
    pub fn before_each<F, T>(&mut self, hook: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        let hook = Hook::new(hook);
        self.push_hook("before_each", |group| group.befores.push(hook));
    }

    /// Run `hook` after every test in the current group and its descendants.
    pub fn after_each<F, T>(&mut self, hook: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        let hook = Hook::new(hook);
        self.push_hook("after_each", |group| group.afters.push(hook));
    }

    /// Register a shared example under `name`. A later registration replaces it.
    pub fn shared_examples<F>(&mut self, name: impl Into<Cow<'static, str>>, body: F)
    where
        F: Fn(&mut Suite) + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return;
        }
        self.shared.register(name, SharedExample::new(body));
    }

    /// Instantiate the shared example `name` as a group named after it.
    pub fn behaves_like(&mut self, name: impl Into<Cow<'static, str>>) {
        self.behaves_like_inner(name.into(), None);
    }

    /// Like [`behaves_like`](Self::behaves_like), with `context` run as the
    /// group's first before hook to set up what the shared example works on.
    pub fn behaves_like_with<F, T>(&mut self, name: impl Into<Cow<'static, str>>, context: F)
    where
        F: Fn(&TestContext) -> T + Send + Sync + 'static,
        T: Into<TestResult>,
    {
        self.behaves_like_inner(name.into(), Some(Hook::new(context)));
    }

    fn behaves_like_inner(&mut self, name: Cow<'static, str>, context: Option<Hook>) {
        if self.error.is_some() {
            return;
        }

        let example = match self.shared.resolve(&name) {
            Ok(example) => example,
            Err(err) => return self.latch(err),
        };

        self.parse_describe(
            name.clone(),
            Options::default(),
            Some(name),
            Some(move |suite: &mut Suite| {
                if let Some(context) = context {
                    suite.current().group.befores.push(context);
                }
                example.call(suite);
            }),
        );
    }

    /// Close the suite and hand out the root group.
    ///
    /// Fails with the latched construction error, if any.
    pub fn finish(mut self) -> Result<Group, BuildError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        // Groups are only left open if a body unwound out of `describe`.
        while let Some(open) = self.open.pop() {
            self.current()
                .group
                .children
                .push(Block::Group(open.finish()));
        }

        Ok(self.root.finish())
    }
}
