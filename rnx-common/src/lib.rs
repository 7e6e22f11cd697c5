//! # RNX Common Library
//!
//! Shared code for the RNX measurement tools:
//! - Error type shared by the level aggregator and the spectral analyzer
//! - TOML configuration loading and resolution
//! - Logging bootstrap
//! - Decibel conversions and energy averaging

pub mod config;
pub mod decibel;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
