//! # schemes
//!
//! Command-line front end for `schemes-core`.
//!
//! - `cli` → argument parsing and command implementations
//! - `config` → optional TOML configuration

pub mod cli;
pub mod config;
