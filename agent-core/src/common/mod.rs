//! Common Utilities
//!
//! Shared error and result types used across the agent core.

pub mod error;
pub mod result;

pub use error::{AgentError, BoxError};
pub use result::AgentResult;
