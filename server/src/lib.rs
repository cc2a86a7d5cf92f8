//! # wsctl Server Library
//!
//! Core library for applying lifecycle actions to remote workspaces in bulk.
//!
//! ## Modules
//!
//! - [`batch_actions`] - Batch start/stop/delete coordination and busy tracking
//! - [`workspace_api`] - Workspace lifecycle contract and its HTTP client
//! - [`model`] - Workspace data models and API payloads
//! - [`common`] - Common error types

pub mod batch_actions;
pub mod common;
pub mod model;
pub mod workspace_api;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
