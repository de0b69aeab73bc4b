//! # VDR Common Library
//!
//! Shared code for the vehicle data resolution crates:
//! - Error and result types
//! - TOML configuration file model and loading
//! - Default configuration path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
