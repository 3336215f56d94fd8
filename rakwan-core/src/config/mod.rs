//! Configuration types
//!
//! Board and radio configuration, parsed from the embedded `radio.toml`.

pub mod parser;
pub mod types;

pub use parser::parse_config;
pub use types::*;
