//! Application layer - View-facing use cases.

/// View interest sets and refresh triggers.
pub mod views;
