//! Input boundaries: the JSON registration-table config and the order
//! fixture reader used by the demo driver.

pub mod config;
pub mod orders;
