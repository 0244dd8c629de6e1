use std::borrow::Cow;

use crate::{
    filter::TreeFilter,
    group::{Block, Group},
};

/// Narrows the tree to nodes carrying one of the requested tags.
///
/// A node declaring a requested tag is kept with its whole subtree. A group
/// without one is kept only while one of its descendants is kept. With no
/// requested tags the tree passes through unchanged.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct TagFilter {
    tags: Vec<Cow<'static, str>>,
}

impl TagFilter {
    pub fn new<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tags(&self) -> &[Cow<'static, str>] {
        &self.tags
    }

    fn requested(&self, block: &Block) -> bool {
        block.tags().iter().any(|tag| self.tags.contains(tag))
    }

    fn retain(&self, block: &Block) -> Option<Block> {
        if self.requested(block) {
            return Some(block.clone());
        }

        match block {
            Block::Group(group) => {
                let narrowed = self.narrow(group);
                (!narrowed.children.is_empty()).then_some(Block::Group(narrowed))
            }
            Block::Test(_) => None,
        }
    }

    fn narrow(&self, group: &Group) -> Group {
        let children = group
            .children
            .iter()
            .filter_map(|child| self.retain(child))
            .collect();
        group.with_children(children)
    }
}

impl TreeFilter for TagFilter {
    fn filter(&self, root: &Group) -> Group {
        match self.tags.is_empty() {
            true => root.clone(),
            false => self.narrow(root),
        }
    }
}
