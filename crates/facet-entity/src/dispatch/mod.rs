//! Dispatch work items and their lifecycle.

pub mod request;
pub mod status;
pub mod task;

pub use request::DispatchRequest;
pub use status::DispatchStatus;
pub use task::{DispatchFailure, DispatchOutcome, DispatchTask};
