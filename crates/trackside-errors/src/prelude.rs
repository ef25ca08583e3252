//! Prelude module for convenient error handling imports.

pub use crate::{
    Result,
    common::{ErrorCategory, ErrorContext, ErrorSeverity, ResultExt, TracksideError},
    config::ConfigError,
    frame::FrameError,
    schema::SchemaError,
};
