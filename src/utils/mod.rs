//! Utility modules

pub mod file_source;
pub mod validation;

pub use file_source::*;
pub use validation::*;
