use std::{
    io,
    string::FromUtf8Error,
    sync::{Arc, Mutex},
};

use kispec::{
    RunError, RunOptions, RunReport, TestFile,
    event::{Dispatcher, Event},
    formatter::{common::color::SupportsColor, install, pretty::PrettyFormatter},
    test::Test,
};

mod sanitize;
pub use sanitize::*;

#[derive(Debug)]
#[allow(dead_code)]
pub enum Error {
    Poison,
    FromUtf8(FromUtf8Error),
}

#[derive(Debug, Default, Clone)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for Buffer {
    fn supports_color(&self) -> bool {
        false
    }
}

impl Buffer {
    pub fn try_to_string(&self) -> Result<String, Error> {
        let guard = self.0.lock().map_err(|_| Error::Poison)?;
        String::from_utf8(guard.to_vec()).map_err(Error::FromUtf8)
    }
}

fn path(test: &Test) -> String {
    test.describe_stack
        .iter()
        .map(|group| group.name.as_ref())
        .chain([test.name.as_ref()])
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Every event of a run, one short line each.
#[derive(Debug, Default, Clone)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn attach(dispatcher: &mut Dispatcher) -> Self {
        let recorder = Self::default();
        let lines = Arc::clone(&recorder.0);
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
        recorder
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A shared list hooks and bodies append to.
#[derive(Debug, Default, Clone)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct Outcome {
    pub result: Result<RunReport, RunError>,
    pub events: Vec<String>,
    pub output: String,
}

impl Outcome {
    pub fn report(&self) -> &RunReport {
        self.result.as_ref().expect("run should load")
    }
}

/// Run `files` with a recorder and an uncolored pretty formatter attached.
pub fn run_files<I>(files: I, options: &RunOptions) -> Outcome
where
    I: IntoIterator,
    I::Item: TestFile,
{
    let mut dispatcher = Dispatcher::new();
    let recorder = Recorder::attach(&mut dispatcher);
    let buffer = Buffer::default();
    let installed = install(
        PrettyFormatter::new().with_target(buffer.clone()),
        &mut dispatcher,
    );

    let result = kispec::run(files, options, &mut dispatcher);
    assert!(installed.take_errors().is_empty());

    Outcome {
        result,
        events: recorder.lines(),
        output: buffer.try_to_string().unwrap(),
    }
}

pub fn run_file(file: impl TestFile) -> Outcome {
    run_files([file], &RunOptions::new())
}
