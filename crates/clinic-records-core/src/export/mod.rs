//! Export functionality for bills.

mod billing;

pub use billing::*;
