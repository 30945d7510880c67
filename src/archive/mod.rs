//! Date-folder archive access: folder naming and anniversary lookup.

pub mod dates;
pub mod locator;
