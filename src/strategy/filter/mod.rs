//! Tree filtering for kispec.
//!
//! A filter turns the block tree built from the test files into the tree that
//! is actually executed. Nodes a filter prunes are gone for the rest of the
//! run: they are never visited, so they never show up in any event.
//!
//! This is different to skipping: a skipped group or test stays in the tree and
//! is reported through the skipping events. Filters carry skip flags over
//! unchanged, they never revive or introduce a skip.
//!
//! Filters are pure. They read the input tree and build a new one, which keeps
//! them composable in any combination.
//!
//! Implement [`TreeFilter`] to define a filter strategy for kispec.

use crate::{group::Group, harness::RunOptions};

mod no;
pub use no::*;

mod focus;
pub use focus::*;

mod tags;
pub use tags::*;

mod random;
pub use random::*;

/// A strategy for narrowing or reordering the block tree before execution.
pub trait TreeFilter {
    /// Build the filtered tree from `root`.
    ///
    /// The root group itself is always part of the result, even if every one
    /// of its children was pruned.
    fn filter(&self, root: &Group) -> Group;
}

impl<F: TreeFilter + ?Sized> TreeFilter for &F {
    fn filter(&self, root: &Group) -> Group {
        (**self).filter(root)
    }
}

/// The filters of a run in their fixed order: focus, then tags, then randomization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPipeline {
    pub focus: FocusFilter,
    pub tags: TagFilter,
    pub random: Option<RandomOrder>,
}

impl FilterPipeline {
    /// Set up the pipeline for `options`.
    ///
    /// A randomized run without a configured seed draws one here.
    pub fn from_options(options: &RunOptions) -> Self {
        let random = options.randomize.then(|| match options.seed {
            Some(seed) => RandomOrder::new(seed),
            None => RandomOrder::from_entropy(),
        });

        Self {
            focus: FocusFilter,
            tags: TagFilter::new(options.tags.iter().cloned()),
            random,
        }
    }

    /// The seed of the randomization stage, if the pipeline randomizes.
    pub fn seed(&self) -> Option<u64> {
        self.random.as_ref().map(RandomOrder::seed)
    }
}

impl TreeFilter for FilterPipeline {
    fn filter(&self, root: &Group) -> Group {
        let before = root.tests().count();
        let focused = self.focus.filter(root);
        let tagged = self.tags.filter(&focused);
        let filtered = match &self.random {
            Some(random) => random.filter(&tagged),
            None => tagged,
        };

        tracing::debug!(
            tests = before,
            remaining = filtered.tests().count(),
            "filtered test tree"
        );
        filtered
    }
}
