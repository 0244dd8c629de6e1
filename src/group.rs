//! Group nodes and the block tree.
//!
//! A [`Group`] is a "describe" node: it carries hooks and an ordered list of
//! child [`Block`]s. Children keep insertion order, only a whole-run
//! randomization pass may reorder them.

use std::{borrow::Cow, ops::Deref, time::Duration};

use crate::test::{Hook, Test};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMeta {
    pub name: Cow<'static, str>,

    /// Set when the group was declared without a body or marked skipped.
    pub skip: bool,
    pub focus: bool,
    pub tags: Vec<Cow<'static, str>>,

    /// Name of the shared example this group was instantiated from.
    pub shared_example: Option<Cow<'static, str>>,
}

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct Group {
    pub meta: GroupMeta,
    pub befores: Vec<Hook>,
    pub afters: Vec<Hook>,
    pub children: Vec<Block>,
}

impl Group {
    pub fn new(meta: GroupMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    /// The implicit group every tree hangs off.
    pub fn root() -> Self {
        Self::new(GroupMeta {
            name: Cow::Borrowed("root"),
            ..Default::default()
        })
    }

    /// Returns a copy of this group with the same hooks but other children.
    pub fn with_children(&self, children: Vec<Block>) -> Self {
        Self {
            meta: self.meta.clone(),
            befores: self.befores.clone(),
            afters: self.afters.clone(),
            children,
        }
    }

    /// Whether any test below this group captured an error.
    ///
    /// Groups carry no pass/fail state of their own, so this always looks at the leaves.
    pub fn any_failed(&self) -> bool {
        self.children.iter().any(Block::any_failed)
    }

    /// Iterate over all tests below this group, depth first.
    pub fn tests(&self) -> impl Iterator<Item = &Test> {
        let mut stack: Vec<&Block> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(block) = stack.pop() {
                match block {
                    Block::Test(test) => return Some(test),
                    Block::Group(group) => stack.extend(group.children.iter().rev()),
                }
            }
            None
        })
    }
}

impl Deref for Group {
    type Target = GroupMeta;

    fn deref(&self) -> &Self::Target {
        &self.meta
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    Group(Group),
    Test(Test),
}

impl Block {
    pub fn name(&self) -> &str {
        match self {
            Block::Group(group) => group.name.as_ref(),
            Block::Test(test) => test.name.as_ref(),
        }
    }

    pub fn focus(&self) -> bool {
        match self {
            Block::Group(group) => group.focus,
            Block::Test(test) => test.focus,
        }
    }

    pub fn tags(&self) -> &[Cow<'static, str>] {
        match self {
            Block::Group(group) => &group.tags,
            Block::Test(test) => &test.tags,
        }
    }

    pub fn any_failed(&self) -> bool {
        match self {
            Block::Group(group) => group.any_failed(),
            Block::Test(test) => test.failed(),
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Block::Group(group) => Some(group),
            Block::Test(_) => None,
        }
    }

    pub fn as_test(&self) -> Option<&Test> {
        match self {
            Block::Test(test) => Some(test),
            Block::Group(_) => None,
        }
    }
}

impl From<Group> for Block {
    fn from(value: Group) -> Self {
        Block::Group(value)
    }
}

impl From<Test> for Block {
    fn from(value: Test) -> Self {
        Block::Test(value)
    }
}

/// Per-node options a caller may hand to `describe_with` and `it_with`.
///
/// Flags set here are merged under the flags forced by the `only` and `skip`
/// variants, so `it_only` focuses a test no matter what the options say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub focus: bool,
    pub skip: bool,
    pub tags: Vec<Cow<'static, str>>,

    /// Only used for tests.
    pub timeout: Option<Duration>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(self) -> Self {
        Self {
            focus: true,
            ..self
        }
    }

    pub fn skip(self) -> Self {
        Self { skip: true, ..self }
    }

    pub fn tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    pub(crate) fn extend_with(self, extension: Extension) -> Self {
        match extension {
            Extension::None => self,
            Extension::Only => self.focus(),
            Extension::Skip => self.skip(),
        }
    }
}

/// Flags forced by a builder variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Extension {
    #[default]
    None,
    Only,
    Skip,
}
