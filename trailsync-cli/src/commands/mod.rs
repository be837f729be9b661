//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration inspection (path, show)
//! - [`sync`] - Run the collection publish pipeline
//! - [`track`] - Write one track's search document

pub mod config;
pub mod sync;
pub mod track;
