//! Inventory module containing the item catalog, the in/out log, and the
//! dashboard session that ties them to uploads

pub mod catalog;
pub mod dashboard;
pub mod log;

pub use catalog::*;
pub use dashboard::*;
pub use log::*;
