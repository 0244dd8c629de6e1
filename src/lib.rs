//! A describe/it test tree builder and runner.
//!
//! Test files declare a tree of groups and tests on a [`Suite`](builder::Suite).
//! [`run`] loads the files, narrows the tree to focused and tagged nodes,
//! optionally shuffles it and executes it one test at a time, dispatching
//! events that formatters turn into output.
//!
//! ```
//! use kispec::{event::Dispatcher, formatter::{install, no::NoFormatter}, test_file, run, RunOptions};
//!
//! let calc = test_file("calc", |s| {
//!     s.describe("calc", |s| {
//!         s.it("adds", |ctx| {
//!             ctx.expect(1 + 1).to_be(2);
//!         });
//!     });
//! });
//!
//! let mut dispatcher = Dispatcher::new();
//! install(NoFormatter, &mut dispatcher);
//! let report = run([calc], &RunOptions::new(), &mut dispatcher).unwrap();
//! assert!(!report.failed);
//! ```

pub mod builder;
pub mod capture;
pub mod context;
pub mod event;
pub mod expect;
pub mod formatter;
pub mod group;
pub mod outcome;
pub mod runner;
pub mod shared;
pub mod timeout;

mod strategy;
pub use strategy::*;

mod harness;
pub use harness::*;

mod report;
pub use report::*;

#[cfg(test)]
mod test_support;
