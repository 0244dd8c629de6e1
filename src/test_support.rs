use std::sync::{Arc, Mutex};

use crate::{
    builder::Suite,
    event::{Dispatcher, Event},
    group::{Block, Group},
    harness::RunOptions,
    report::RunReport,
    runner::run_parsed_blocks,
    test::Test,
};

pub fn tree(build: impl FnOnce(&mut Suite)) -> Group {
    let mut suite = Suite::new();
    build(&mut suite);
    suite.finish().unwrap()
}

/// One line per node, depth first: `a/` for groups and `a/b` for tests.
pub fn outline(root: &Group) -> Vec<String> {
    fn walk(group: &Group, prefix: &str, lines: &mut Vec<String>) {
        for child in &group.children {
            match child {
                Block::Group(inner) => {
                    let path = format!("{prefix}{}/", inner.name);
                    lines.push(path.clone());
                    walk(inner, &path, lines);
                }
                Block::Test(test) => lines.push(format!("{prefix}{}", test.name)),
            }
        }
    }

    let mut lines = Vec::new();
    walk(root, "", &mut lines);
    lines
}

fn path(test: &Test) -> String {
    test.describe_stack
        .iter()
        .map(|group| group.name.as_ref())
        .chain([test.name.as_ref()])
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Records every dispatched event as a short line.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn attach(dispatcher: &mut Dispatcher) -> Self {
        let log = Self::default();
        let lines = Arc::clone(&log.0);
        dispatcher.listen_all(move |event| {
            let line = match event {
                Event::BeginningDescribe { group, .. } => format!("begin {}", group.name),
                Event::SkippingDescribe { group, .. } => format!("skip-describe {}", group.name),
                Event::SkippingTest(test) => format!("skip {}", path(test)),
                Event::FinishedTest(test) if test.failed() => format!("fail {}", path(test)),
                Event::FinishedTest(test) => format!("pass {}", path(test)),
                Event::FinishedTestRun => String::from("done"),
            };
            lines.lock().unwrap().push(line);
        });
        log
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A shared list hooks and bodies append to, to observe execution order.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: &str) {
        self.0.lock().unwrap().push(entry.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub fn run_with(root: &Group, options: &RunOptions) -> (RunReport, Vec<String>) {
    let mut dispatcher = Dispatcher::new();
    let log = EventLog::attach(&mut dispatcher);
    let report = run_parsed_blocks(root, options, &mut dispatcher);
    (report, log.lines())
}

pub fn run(root: &Group) -> (RunReport, Vec<String>) {
    run_with(root, &RunOptions::default())
}
