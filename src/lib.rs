//! Catena Application Library
//!
//! This library provides the category path materialization modules and
//! utilities for catena.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
