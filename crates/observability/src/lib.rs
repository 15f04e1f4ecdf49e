//! Logging setup shared by the red pencil binaries.

pub mod logging;

pub use logging::{LogFormat, init};
