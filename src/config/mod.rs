//! Configuration module for linkwalk
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use linkwalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkwalk.toml")).unwrap();
//! println!("Links are checked {} at a time", config.checker.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AccessConfig, CheckerConfig, Config, ExtractMode, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
