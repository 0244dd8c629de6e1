//! The execution engine.
//!
//! The engine walks a filtered tree depth first, strictly one test at a time.
//! It dispatches an event for every group and test it visits and fills in the
//! errors and describe stack of every test it runs.
//!
//! A runnable test goes through the before hooks of all its ancestors (root
//! first), its body and then the after hooks of all its ancestors (also root
//! first). A panicking or erroring hook or body ends the test right there:
//! nothing after it runs, not even the after hooks. Failed expectations do not
//! end a test, they only accumulate.

use std::{thread, time::Instant};

use crossbeam_channel::RecvError;

use crate::{
    capture::{CaughtPanic, catch_panic, install_panic_capture},
    context::TestContext,
    event::{Dispatcher, Event},
    filter::{FilterPipeline, TreeFilter},
    group::{Block, Group, GroupMeta},
    harness::RunOptions,
    outcome::{Phase, TestError},
    report::{RunReport, Summary},
    test::{AsyncFn, Hook, Test, TestBody, TestMeta, TestResult},
    timeout::TimeoutGuard,
};

/// Filter `root` with the pipeline described by `options`, execute the result
/// and dispatch [`Event::FinishedTestRun`].
pub fn run_parsed_blocks(
    root: &Group,
    options: &RunOptions,
    dispatcher: &mut Dispatcher,
) -> RunReport {
    install_panic_capture();

    let pipeline = FilterPipeline::from_options(options);
    let mut tree = pipeline.filter(root);

    let now = Instant::now();
    let summary = execute(&mut tree, dispatcher);
    let duration = now.elapsed();

    let failed = tree.any_failed();
    dispatcher.dispatch(&Event::FinishedTestRun);
    tracing::debug!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "finished test run"
    );

    RunReport {
        failed,
        tree,
        summary,
        duration,
        seed: pipeline.seed(),
    }
}

/// Execute an already filtered tree in place.
///
/// The root group itself is not announced, only its descendants are.
pub fn execute(tree: &mut Group, dispatcher: &mut Dispatcher) -> Summary {
    let mut engine = Engine {
        dispatcher,
        describe_stack: Vec::new(),
        hooks: vec![HookFrame::of(tree)],
        summary: Summary::default(),
    };
    for child in &mut tree.children {
        engine.visit(child);
    }
    engine.summary
}

/// The hooks one ancestor group contributes to every test below it.
#[derive(Debug)]
struct HookFrame {
    befores: Vec<Hook>,
    afters: Vec<Hook>,
}

impl HookFrame {
    fn of(group: &Group) -> Self {
        Self {
            befores: group.befores.clone(),
            afters: group.afters.clone(),
        }
    }
}

struct Engine<'d> {
    dispatcher: &'d mut Dispatcher,
    describe_stack: Vec<GroupMeta>,
    hooks: Vec<HookFrame>,
    summary: Summary,
}

impl Engine<'_> {
    fn visit(&mut self, block: &mut Block) {
        match block {
            Block::Group(group) if group.skip => {
                tracing::debug!(group = %group.name, "skipping group");
                self.dispatcher.dispatch(&Event::SkippingDescribe {
                    describe_stack: &self.describe_stack,
                    group,
                });
            }
            Block::Group(group) => self.visit_group(group),
            Block::Test(test) => self.visit_test(test),
        }
    }

    fn visit_group(&mut self, group: &mut Group) {
        tracing::debug!(group = %group.name, depth = self.describe_stack.len(), "entering group");
        self.dispatcher.dispatch(&Event::BeginningDescribe {
            describe_stack: &self.describe_stack,
            group,
        });

        self.describe_stack.push(group.meta.clone());
        self.hooks.push(HookFrame::of(group));
        for child in &mut group.children {
            self.visit(child);
        }
        self.hooks.pop();
        self.describe_stack.pop();
    }

    fn visit_test(&mut self, test: &mut Test) {
        test.describe_stack = self.describe_stack.clone();

        let body = match (&test.body, test.meta.skip) {
            (Some(body), false) => body.clone(),
            _ => {
                tracing::debug!(test = %test.name, "skipping test");
                self.summary.skipped += 1;
                self.dispatcher.dispatch(&Event::SkippingTest(test));
                return;
            }
        };

        tracing::debug!(test = %test.name, "running test");
        test.errors = self.run_test(&test.meta, &body);
        match test.failed() {
            true => self.summary.failed += 1,
            false => self.summary.passed += 1,
        }
        tracing::debug!(test = %test.name, errors = test.errors.len(), "finished test");

        self.dispatcher.dispatch(&Event::FinishedTest(test));
    }

    fn run_test(&self, meta: &TestMeta, body: &TestBody) -> Vec<TestError> {
        let ctx = TestContext::new(meta.name.clone(), meta.timeout);

        let outcome = self
            .hooks
            .iter()
            .flat_map(|frame| &frame.befores)
            .try_for_each(|hook| invoke(Phase::BeforeEach, || hook.call(&ctx)))
            .and_then(|()| run_body(body, &ctx))
            .and_then(|()| {
                self.hooks
                    .iter()
                    .flat_map(|frame| &frame.afters)
                    .try_for_each(|hook| invoke(Phase::AfterEach, || hook.call(&ctx)))
            });

        let mut errors = ctx.seal();
        if let Err(err) = outcome {
            errors.push(err);
        }
        errors
    }
}

fn settle(phase: Phase, result: Result<TestResult, CaughtPanic>) -> Result<(), TestError> {
    match result {
        Ok(TestResult(Ok(()))) => Ok(()),
        Ok(TestResult(Err(message))) => Err(TestError::Returned { phase, message }),
        Err(caught) => Err(TestError::Panicked {
            phase,
            message: caught.to_string(),
        }),
    }
}

fn invoke(phase: Phase, f: impl FnOnce() -> TestResult) -> Result<(), TestError> {
    settle(phase, catch_panic(f))
}

fn run_body(body: &TestBody, ctx: &TestContext) -> Result<(), TestError> {
    match body {
        TestBody::Sync(f) => invoke(Phase::Body, || f(ctx)),
        TestBody::Async(f) => run_async_body(f, ctx),
    }
}

/// Drive an async body on its own thread and race it against the test's timeout.
///
/// The guard is armed with the limit in effect once the future exists and then
/// follows every later [`TestContext::times_out_after`] made by the body.
fn run_async_body(f: &AsyncFn, ctx: &TestContext) -> Result<(), TestError> {
    let changes = ctx.timeout_changes();
    let future = catch_panic(|| f(ctx.clone())).map_err(|caught| TestError::Panicked {
        phase: Phase::Body,
        message: caught.to_string(),
    })?;

    // Limits set by hooks or the prologue are already part of `ctx.timeout()`.
    changes.try_iter().for_each(drop);
    let guard = TimeoutGuard::start(ctx.timeout()).watching(changes);
    let (settled_tx, settled) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name(format!("kispec: {}", ctx.test_name()))
        .spawn(move || {
            let result = catch_panic(|| futures::executor::block_on(future));
            // Nobody listens anymore if the guard fired first.
            let _ = settled_tx.send(result);
        })
        .map_err(|err| {
            TestError::Failed(format!("could not spawn a thread for the test body: {err}"))
        })?;

    match guard.race(&settled) {
        Ok(Ok(result)) => settle(Phase::Body, result),
        Ok(Err(RecvError)) => Err(TestError::Failed(String::from(
            "the test body thread exited without a result",
        ))),
        Err(timeout) => {
            tracing::warn!(
                test = %ctx.test_name(),
                timeout_ms = timeout.timeout.as_millis() as u64,
                "test timed out"
            );
            Err(timeout.into())
        }
    }
}
