//! Common helpers for formatter implementations.

pub mod color;
