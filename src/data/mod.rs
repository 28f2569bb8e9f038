//! Data module
//!
//! Loads the preprocessed order-book export (CSV or Parquet) into venue tables

mod loader;
mod types;

pub use loader::PanelLoader;
pub use types::{InputFormat, LoadError};
