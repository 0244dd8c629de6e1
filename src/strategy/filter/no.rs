use crate::{filter::TreeFilter, group::Group};

/// A [`TreeFilter`] that keeps the tree as it is.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct NoFilter;

impl NoFilter {
    pub fn new() -> Self {
        Self
    }
}

impl TreeFilter for NoFilter {
    fn filter(&self, root: &Group) -> Group {
        root.clone()
    }
}
