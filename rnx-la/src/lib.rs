//! rnx-la library interface
//!
//! Energy-averaged band levels for Rion NL-52 exports. Exposes the parser,
//! averager, result table and report writer for the binary and for
//! integration testing.

pub mod bands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{LevelError, Result};
pub use crate::workflow::LevelWorkflow;
