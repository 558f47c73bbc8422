//! Agentfs main library
//!
//! Re-exports the configuration, error types and tools of the workspace
//! crates so embedders only need one dependency.

pub use agentfs_core::*;
pub use agentfs_tools::*;
