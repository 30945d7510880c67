//! Media classification.

pub mod classify;

pub use classify::{MediaKind, classify};
