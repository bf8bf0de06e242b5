//! Core types for the chat pipeline.

pub mod error;
pub mod table;

pub use error::{ChatError, Result};
pub use table::QueryTable;
