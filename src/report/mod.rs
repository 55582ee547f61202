//! Terminal reporting: run summary, forecast table and leg table.

pub mod format;

pub use format::*;
