//! Swappable stages of a run.

pub mod filter;
