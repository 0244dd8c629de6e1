//! Matchers for use inside hooks and test bodies.
//!
//! An [`Expectation`] is created through [`TestContext::expect`]. A mismatch
//! records an [`ExpectationError`] on the running test and returns, so several
//! failed expectations in one body all end up in the test's errors.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt::{Debug, Display},
    str::FromStr,
};

use crate::{capture::catch_panic, context::TestContext};

/// The built-in matchers, by the name they are known under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    ToBe,
    ToBeDefined,
    ToHaveLength,
    ToThrow,
}

impl Matcher {
    pub const ALL: [Matcher; 4] = [
        Matcher::ToBe,
        Matcher::ToBeDefined,
        Matcher::ToHaveLength,
        Matcher::ToThrow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Matcher::ToBe => "toBe",
            Matcher::ToBeDefined => "toBeDefined",
            Matcher::ToHaveLength => "toHaveLength",
            Matcher::ToThrow => "toThrow",
        }
    }
}

impl Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown matcher `{0}`")]
pub struct UnknownMatcher(pub String);

impl FromStr for Matcher {
    type Err = UnknownMatcher;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Matcher::ALL
            .into_iter()
            .find(|matcher| matcher.name() == s)
            .ok_or_else(|| UnknownMatcher(s.to_string()))
    }
}

/// Values substituted into an expectation message template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub actual: Option<String>,
    pub expected: Option<String>,
    pub source: Option<String>,
}

/// A failed expectation.
///
/// The message is rendered from a template containing `<actual>`,
/// `<expected>` and `<source>` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected {message}")]
pub struct ExpectationError {
    pub matcher: Matcher,
    pub message: String,
}

impl ExpectationError {
    pub fn new(matcher: Matcher, template: &str, placeholders: Placeholders) -> Self {
        Self {
            matcher,
            message: render(template, &placeholders),
        }
    }
}

/// Substitute placeholders in one pass, so substituted values are never scanned again.
fn render(template: &str, placeholders: &Placeholders) -> String {
    let keys = [
        ("<actual>", &placeholders.actual),
        ("<expected>", &placeholders.expected),
        ("<source>", &placeholders.source),
    ];

    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('<') {
        message.push_str(&rest[..start]);
        let tail = &rest[start..];
        let substituted = keys.iter().find_map(|(key, value)| {
            match (tail.strip_prefix(*key), value.as_deref()) {
                (Some(after), Some(value)) => Some((after, value)),
                _ => None,
            }
        });
        match substituted {
            Some((after, value)) => {
                message.push_str(value);
                rest = after;
            }
            None => {
                message.push('<');
                rest = &tail[1..];
            }
        }
    }
    message.push_str(rest);
    message
}

/// Things that have a length for [`Expectation::to_have_length`].
pub trait Length {
    fn length(&self) -> usize;
}

impl<T> Length for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> Length for [T; N] {
    fn length(&self) -> usize {
        N
    }
}

impl Length for str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl Length for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }
}

macro_rules! impl_length_by_len {
    [$($ty:ident<$($generic:ident),*>),* $(,)?] => {$(
        impl<$($generic),*> Length for $ty<$($generic),*> {
            fn length(&self) -> usize {
                self.len()
            }
        }
    )*};
}

impl_length_by_len![
    Vec<T>,
    VecDeque<T>,
    HashMap<K, V>,
    BTreeMap<K, V>,
    HashSet<T>,
    BTreeSet<T>,
];

impl<L: Length + ?Sized> Length for &L {
    fn length(&self) -> usize {
        (**self).length()
    }
}

#[derive(Debug)]
pub struct Expectation<'c, T> {
    ctx: &'c TestContext,
    actual: T,
    source: Option<String>,
}

impl<'c, T> Expectation<'c, T> {
    pub(crate) fn new(ctx: &'c TestContext, actual: T) -> Self {
        Self {
            ctx,
            actual,
            source: None,
        }
    }

    /// Name the value under test for `<source>` in failure messages.
    pub fn described_as(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    fn source(&self) -> String {
        self.source.clone().unwrap_or_else(|| String::from("closure"))
    }

    fn check(&self, passed: bool, error: impl FnOnce() -> ExpectationError) -> &Self {
        if !passed {
            self.ctx.record(error());
        }
        self
    }
}

impl<'c, T: Debug> Expectation<'c, T> {
    pub fn to_be<U: Debug>(&self, expected: U) -> &Self
    where
        T: PartialEq<U>,
    {
        self.check(self.actual == expected, || {
            ExpectationError::new(
                Matcher::ToBe,
                "<actual> to be <expected>",
                Placeholders {
                    actual: Some(format!("{:?}", self.actual)),
                    expected: Some(format!("{expected:?}")),
                    source: None,
                },
            )
        })
    }
}

impl<'c, V: Debug> Expectation<'c, Option<V>> {
    pub fn to_be_defined(&self) -> &Self {
        self.check(self.actual.is_some(), || {
            ExpectationError::new(
                Matcher::ToBeDefined,
                "<actual> to be defined",
                Placeholders {
                    actual: Some(format!("{:?}", self.actual)),
                    ..Default::default()
                },
            )
        })
    }
}

impl<'c, T: Length> Expectation<'c, T> {
    pub fn to_have_length(&self, expected: usize) -> &Self {
        let actual = self.actual.length();
        self.check(actual == expected, || {
            ExpectationError::new(
                Matcher::ToHaveLength,
                "value to have length <expected> but it was <actual>",
                Placeholders {
                    actual: Some(actual.to_string()),
                    expected: Some(expected.to_string()),
                    source: None,
                },
            )
        })
    }
}

impl<'c, F: Fn()> Expectation<'c, F> {
    /// Expect calling the closure to panic.
    pub fn to_throw(&self) -> &Self {
        let threw = catch_panic(&self.actual).is_err();
        self.check(threw, || self.did_not_throw())
    }

    /// Expect calling the closure to panic with exactly `expected` as message.
    pub fn to_throw_with(&self, expected: &str) -> &Self {
        match catch_panic(&self.actual) {
            Ok(()) => self.check(false, || self.did_not_throw()),
            Err(caught) => self.check(caught.message == expected, || {
                ExpectationError::new(
                    Matcher::ToThrow,
                    "<source> to throw an exception, but the thrown error message did not match the expected message.\n  Expected exception message: <expected>\n    Actual exception message: <actual>\n",
                    Placeholders {
                        actual: Some(caught.message.clone()),
                        expected: Some(expected.to_string()),
                        source: Some(self.source()),
                    },
                )
            }),
        }
    }

    fn did_not_throw(&self) -> ExpectationError {
        ExpectationError::new(
            Matcher::ToThrow,
            "<source> to throw exception but it did not",
            Placeholders {
                source: Some(self.source()),
                ..Default::default()
            },
        )
    }
}
