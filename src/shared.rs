//! Shared examples: named group bodies reused across the tree.
//!
//! Registration happens while test files load. A later registration under the
//! same name replaces the earlier one, so `behaves_like` always resolves to the
//! latest definition made before it.

use std::{borrow::Cow, collections::HashMap, fmt::Debug, sync::Arc};

use crate::builder::{BuildError, Suite};

#[derive(Clone)]
pub struct SharedExample(Arc<dyn Fn(&mut Suite) + Send + Sync>);

impl SharedExample {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Suite) + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    pub fn call(&self, suite: &mut Suite) {
        (self.0)(suite)
    }
}

impl Debug for SharedExample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedExample(...)")
    }
}

#[derive(Debug, Default, Clone)]
pub struct SharedExamples {
    examples: HashMap<Cow<'static, str>, SharedExample>,
}

impl SharedExamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `example` under `name`, replacing any earlier registration.
    pub fn register(&mut self, name: impl Into<Cow<'static, str>>, example: SharedExample) {
        let name = name.into();
        if self.examples.insert(name.clone(), example).is_some() {
            tracing::debug!(%name, "replaced shared example");
        }
    }

    pub fn resolve(&self, name: &str) -> Result<SharedExample, BuildError> {
        self.examples
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::SharedExampleNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
