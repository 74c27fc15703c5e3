//! # Built-in sinks
//!
//! - [`LogWriter`]: renders diagnostics as `tracing` events (demo/debug).

mod log;

pub use log::LogWriter;
