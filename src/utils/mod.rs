//! Supporting utilities.

pub mod fs;
pub mod progress;
