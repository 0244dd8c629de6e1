use crate::{
    filter::TreeFilter,
    group::{Block, Group},
};

/// Narrows the tree to focused nodes.
///
/// When nothing in the tree is focused the tree passes through unchanged.
/// Otherwise a focused node is kept together with its whole subtree, and an
/// unfocused group is kept only as the path to focused descendants. Everything
/// else is pruned.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct FocusFilter;

impl FocusFilter {
    pub fn new() -> Self {
        Self
    }
}

fn contains_focus(block: &Block) -> bool {
    match block {
        Block::Test(test) => test.focus,
        Block::Group(group) => group.focus || group.children.iter().any(contains_focus),
    }
}

fn narrow(group: &Group) -> Group {
    let children = group
        .children
        .iter()
        .filter_map(|child| match child {
            child if child.focus() => Some(child.clone()),
            Block::Group(inner) if inner.children.iter().any(contains_focus) => {
                Some(Block::Group(narrow(inner)))
            }
            _ => None,
        })
        .collect();
    group.with_children(children)
}

impl TreeFilter for FocusFilter {
    fn filter(&self, root: &Group) -> Group {
        match root.children.iter().any(contains_focus) {
            true => narrow(root),
            false => root.clone(),
        }
    }
}
