//! # wsctl
//!
//! Command line front end for applying start, stop and delete to many
//! workspaces at once.
//!
//! ## Modules
//!
//! - [`app`] - command orchestration over the batch coordinator
//! - [`components`] - the typed-phrase delete confirmation gate
//! - [`config`] - configuration loading, overrides and validation
//! - [`error`] - error types and centralized error reporting
//! - [`logger`] - logging configuration
//! - [`validation`] - input validation
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod validation;

pub use error::AppError;

pub use validation::Validator;
