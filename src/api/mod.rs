//! API route definitions
//!
//! One router builder per concern, merged in [main](crate). HTML pages and
//! media bytes are the primary surface; `/media-query` serves structured
//! consumers (e.g. a kiosk frontend), and health/metrics are operational.

pub mod health;
pub mod media;
pub mod metrics;
pub mod pages;
pub mod query;
