//! Travel inference: turn a game schedule into city-to-city legs.

pub mod legs;

pub use legs::*;
