//! Error handling for opsgate
//!
//! This module defines the crate error type and its HTTP rendering.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod response;
#[cfg(test)]
mod tests;
mod types;

pub use response::{ErrorDetail, ErrorResponse, HandledError};
pub use types::{OpsError, Result};
