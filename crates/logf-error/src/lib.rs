//! # logf-error
//!
//! Failure type for the fallible edges of logf.
//!
//! The field-annotation core never fails: wrapping, chain extraction and joining always
//! succeed. What can fail lives around it:
//!
//! - **Level parsing**: an unknown level name
//! - **Configuration**: a missing or malformed config file
//! - **Nested encoding**: an `ArrayEncoder`/`ObjectEncoder` callback refusing to encode
//!
//! ## Usage
//!
//! ```rust
//! use logf_error::{Error, ErrorKind};
//!
//! fn load() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ConfigInvalid, "unknown key")
//!         .with_operation("config::from_toml_str")
//!         .with_context("key", "levle"))
//! }
//! ```
//!
//! `Error` implements `std::error::Error` and exposes its source, so it can itself be
//! wrapped with fields and walked like any other cause chain.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using logf Error
pub type Result<T> = std::result::Result<T, Error>;
