//! Delivery targets: handler shapes and execution-context affinity.

mod affinity;
mod handler;

pub use affinity::Affinity;
pub use handler::{BoundMethod, Handler};

pub(crate) use handler::Invocation;
