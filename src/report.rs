use std::{
    process::{ExitCode, Termination},
    time::Duration,
};

use crate::group::Group;

/// Test counts of a run.
///
/// A test inside a skipped group is never visited and is not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// The result of executing a block tree.
#[derive(Debug)]
#[non_exhaustive]
pub struct RunReport {
    /// Whether any test in the executed tree captured an error.
    pub failed: bool,

    /// The executed tree, with errors and describe stacks filled in.
    pub tree: Group,
    pub summary: Summary,
    pub duration: Duration,

    /// The seed the run was shuffled with, if it was randomized.
    pub seed: Option<u64>,
}

impl RunReport {
    /// `0` when every test passed, `1` when at least one failed.
    pub fn exit_code(&self) -> u8 {
        match self.failed {
            false => 0,
            true => 1,
        }
    }
}

impl Termination for RunReport {
    fn report(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }
}
