//! Contract module - the digital service agreement and its PDF assembly.
//!
//! - `model` - the `ContractRecord` wire type
//! - `validation` - field validators with user-facing messages
//! - `common` - clock abstraction, date/filename/text-encoding helpers
//! - `pdf` - fixed-coordinate page builder
//! - `assembler` - lays the record out as the contract document
//! - `handlers` - HTTP endpoints

pub mod assembler;
pub mod common;
pub mod handlers;
pub mod model;
pub mod pdf;
pub mod validation;

pub use assembler::ContractAssembler;
pub use model::ContractRecord;

use thiserror::Error;

/// Errors that can occur while assembling the contract document.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("failed to render contract PDF: {0}")]
    Render(String),
}

/// Result of a successful assembly.
#[derive(Debug)]
pub struct AssembledContract {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub issue_date: String,
}
