//! Device template persistence.
//!
//! Associates device identifiers with SVG template files used by the export
//! pipeline.

mod db;

pub use db::{TemplateDb, TemplateRow};
