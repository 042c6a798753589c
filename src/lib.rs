//! etlgen: request form for generating ETL pipeline code.
//!
//! Pick a source and a destination, describe the pipeline, submit. The
//! form logic lives in `form` and knows nothing about terminals; `tui`
//! and `headless` are two ways of driving it.

pub mod catalog;
pub mod config;
pub mod form;
pub mod generation;
pub mod headless;
pub mod notify;
pub mod tui;
