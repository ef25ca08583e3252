//! Centralized error types for Trackside
//!
//! Every crate in the workspace reports failures through the types defined
//! here, so transport loops and the CLI can classify and log them uniformly.
//!
//! # Architecture
//!
//! - [`common`]: The umbrella error, classification and context utilities
//! - [`frame`]: Wire-level frame decoding failures
//! - [`schema`]: Decode-rule table construction failures
//! - [`config`]: Configuration loading and validation failures
//!
//! # Recoverability
//!
//! Frame errors are always recoverable: they abort the current buffer only,
//! and the ingestion loop keeps waiting for the next one. Schema errors are
//! raised at startup and are fatal for the process.
//!
//! # Example
//!
//! ```
//! use trackside_errors::prelude::*;
//!
//! fn check_dlc(dlc: u8) -> Result<u8> {
//!     if dlc > 8 {
//!         return Err(FrameError::InvalidDataLength { dlc }.into());
//!     }
//!     Ok(dlc)
//! }
//!
//! assert!(check_dlc(9).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod config;
pub mod frame;
pub mod prelude;
pub mod schema;

pub use common::{ErrorCategory, ErrorContext, ErrorSeverity, ResultExt, TracksideError};
pub use config::ConfigError;
pub use frame::FrameError;
pub use schema::SchemaError;

/// A specialized `Result` type for Trackside operations.
pub type Result<T> = std::result::Result<T, TracksideError>;
