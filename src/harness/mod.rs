//! Loading test files and running the resulting tree.
//!
//! [`run`] is the entry point. Every call starts from an empty [`Suite`], so
//! repeated runs (for example in a watch loop) never see declarations of an
//! earlier run.

use crate::{
    builder::{BuildError, Suite},
    capture::{catch_panic, install_panic_capture},
    event::Dispatcher,
    report::RunReport,
    runner::run_parsed_blocks,
};

mod file;
pub use file::*;

mod options;
pub use options::*;

/// A failure that stops a run before any test executes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RunError {
    #[error("could not load test file `{file}`")]
    Load { file: String, source: LoadError },

    #[error("could not build the test tree of `{file}`")]
    Build { file: String, source: BuildError },
}

impl RunError {
    /// Distinct from the exit codes of a [`RunReport`].
    pub fn exit_code(&self) -> u8 {
        2
    }

    pub fn file(&self) -> &str {
        match self {
            RunError::Load { file, .. } | RunError::Build { file, .. } => file,
        }
    }
}

/// Load `files` in order, then filter and execute the tree they declared.
///
/// Loading stops at the first file that fails to load or declares an invalid
/// tree. In that case no test runs and no event is dispatched.
pub fn run<I>(
    files: I,
    options: &RunOptions,
    dispatcher: &mut Dispatcher,
) -> Result<RunReport, RunError>
where
    I: IntoIterator,
    I::Item: TestFile,
{
    install_panic_capture();

    let mut suite = Suite::new();
    let mut last_file = String::new();
    for file in files {
        let name = file.name().to_string();
        tracing::debug!(file = %name, "loading test file");

        match catch_panic(|| file.load(&mut suite)) {
            Ok(Ok(())) => (),
            Ok(Err(source)) => return Err(RunError::Load { file: name, source }),
            Err(caught) => {
                return Err(RunError::Load {
                    file: name,
                    source: LoadError::Panicked(caught.to_string()),
                });
            }
        }

        if let Some(source) = suite.take_error() {
            return Err(RunError::Build { file: name, source });
        }
        last_file = name;
    }

    let root = suite.finish().map_err(|source| RunError::Build {
        file: last_file,
        source,
    })?;
    tracing::debug!(tests = root.tests().count(), "loaded test files");

    Ok(run_parsed_blocks(&root, options, dispatcher))
}
