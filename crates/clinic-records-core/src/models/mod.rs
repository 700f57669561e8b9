//! Domain models for the clinic records store.

mod appointment;
mod bill;
mod notification;
mod patient;

pub use appointment::*;
pub use bill::*;
pub use notification::*;
pub use patient::*;

use thiserror::Error;

/// A string that does not name any variant of a closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
