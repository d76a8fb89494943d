//! Keymangle - translation key extraction and mangling
//!
//! Keymangle scans bundled source text for translation keys matched by a
//! configurable pattern, optionally rewrites them into short generated
//! identifiers, and writes a mapping of assigned keys back to original keys
//! for each output group (chunk) and run.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line host (file discovery, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction and mangling engine
//! - `output`: Persisting key mappings as JSON
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod output;
pub mod utils;
