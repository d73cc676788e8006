//! Stickmap library - HOTAS profile parsing and SVG diagram export.
//!
//! This library exposes the core functionality of the `stickmap` CLI for use
//! in tests and potentially other applications.
//!
//! # Modules
//!
//! - `adaptor`: Vendor profile parsers producing the binding dictionary
//! - `error`: Error types with user-recoverable hints
//! - `state`: Application-wide processed-profile mapping
//! - `template`: Device-to-SVG-template persistence
//! - `export`: Rendering bindings onto SVG diagrams
//! - `settings`: TOML application settings
#![forbid(unsafe_code)]

pub mod adaptor;
pub mod cli;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;
pub mod settings;
pub mod state;
pub mod template;
