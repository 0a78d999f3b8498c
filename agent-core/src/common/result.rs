//! Common Result Type
//!
//! Type alias for agent results.

use super::error::AgentError;

/// Agent result type
///
/// Uses AgentError for consistent error handling across the registry,
/// configuration and plugin lifecycle.
pub type AgentResult<T> = Result<T, AgentError>;
