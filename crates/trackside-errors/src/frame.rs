//! Wire-level frame decoding errors.
//!
//! A frame error aborts decoding of the remainder of one delivered buffer.
//! Frames decoded from the same buffer before the failure stay applied, and
//! the ingestion loop continues with the next buffer.

use crate::common::ErrorSeverity;

/// Largest data-length code a bus frame may declare.
pub const MAX_DLC: u8 = 8;

/// Smallest header any recognized layout starts with: flags, id and dlc.
pub const MIN_HEADER_LEN: usize = 9;

/// Frame decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes remain than the smallest acceptable layout needs.
    #[error(
        "buffer too short to contain any recognized layout: {available} bytes, need at least {required}"
    )]
    BufferTooShort {
        /// Bytes remaining in the buffer
        available: usize,
        /// Bytes the smallest acceptable layout needs
        required: usize,
    },

    /// A minimal-layout header declares more payload than the buffer holds.
    #[error("truncated payload: dlc {dlc} declared but only {available} payload bytes remain")]
    TruncatedPayload {
        /// Declared data-length code
        dlc: u8,
        /// Payload bytes actually present
        available: usize,
    },

    /// The data-length code exceeds the bus maximum of 8.
    #[error("invalid data length code {dlc}: must be at most 8")]
    InvalidDataLength {
        /// Declared data-length code
        dlc: u8,
    },

    /// A delivered buffer filled the receive buffer and may have been cut short.
    #[error("buffer exceeds the {limit} byte receive limit and was dropped")]
    Oversized {
        /// Configured receive limit in bytes
        limit: usize,
    },
}

impl FrameError {
    /// Buffer too short for even the minimal header.
    pub fn too_short(available: usize) -> Self {
        FrameError::BufferTooShort {
            available,
            required: MIN_HEADER_LEN,
        }
    }

    /// Get the severity of this error.
    ///
    /// Every frame error is a warning: it costs at most one buffer.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }

    /// Check whether the error stems from missing bytes rather than bad content.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            FrameError::BufferTooShort { .. }
                | FrameError::TruncatedPayload { .. }
                | FrameError::Oversized { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_too_short_message() {
        let err = FrameError::too_short(4);
        let msg = err.to_string();
        assert!(msg.contains("buffer too short"));
        assert!(msg.contains("4 bytes"));
        assert!(msg.contains("at least 9"));
    }

    #[test]
    fn test_truncated_payload_message() {
        let err = FrameError::TruncatedPayload {
            dlc: 5,
            available: 3,
        };
        assert!(err.to_string().contains("truncated payload"));
        assert!(err.is_truncation());
    }

    #[test]
    fn test_invalid_dlc_is_not_truncation() {
        let err = FrameError::InvalidDataLength { dlc: 15 };
        assert!(!err.is_truncation());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_oversized_counts_as_truncation() {
        let err = FrameError::Oversized { limit: 46 };
        assert!(err.is_truncation());
        assert!(err.to_string().contains("46 byte"));
    }
}
