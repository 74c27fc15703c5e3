//! Diagnostics: reporting of conditions the center absorbs.
//!
//! ## Contents
//! - [`DiagnosticKind`], [`Diagnostic`] classification and metadata
//! - [`DiagnosticSink`] extension point
//! - [`DiagnosticSet`] synchronous fan-out shared by the center and main executor
//! - `LogWriter` built-in sink (feature `logging`)

mod diagnostic;
#[cfg(feature = "logging")]
mod embedded;
mod set;
mod sink;

pub use diagnostic::{Diagnostic, DiagnosticKind};
#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::DiagnosticSet;
pub use sink::DiagnosticSink;

pub(crate) use set::panic_message;
pub(crate) use sink::FnSink;
