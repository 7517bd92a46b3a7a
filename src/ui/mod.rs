//! Shared terminal screens.

pub mod error;

pub use error::{report_error, ErrorScreen};
