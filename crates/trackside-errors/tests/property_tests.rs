//! Property-based tests for error classification and context.

use proptest::prelude::*;
use trackside_errors::{
    ErrorCategory, ErrorContext, ErrorSeverity, FrameError, ResultExt, TracksideError,
};

fn arb_frame_error() -> impl Strategy<Value = FrameError> {
    prop_oneof![
        (0usize..64, 9usize..64)
            .prop_map(|(available, required)| FrameError::BufferTooShort { available, required }),
        (0u8..=8, 0usize..8)
            .prop_map(|(dlc, available)| FrameError::TruncatedPayload { dlc, available }),
        (9u8..=u8::MAX).prop_map(|dlc| FrameError::InvalidDataLength { dlc }),
        (1usize..65_536).prop_map(|limit| FrameError::Oversized { limit }),
    ]
}

proptest! {
    #[test]
    fn test_frame_errors_are_always_recoverable(err in arb_frame_error()) {
        let wrapped = TracksideError::from(err);
        prop_assert_eq!(wrapped.category(), ErrorCategory::Frame);
        prop_assert_eq!(wrapped.severity(), ErrorSeverity::Warning);
        prop_assert!(wrapped.is_recoverable());
    }

    #[test]
    fn test_truncation_excludes_invalid_dlc(err in arb_frame_error()) {
        let invalid = matches!(err, FrameError::InvalidDataLength { .. });
        prop_assert_eq!(err.is_truncation(), !invalid);
    }

    #[test]
    fn test_display_mentions_dlc(dlc in 9u8..=u8::MAX) {
        let msg = FrameError::InvalidDataLength { dlc }.to_string();
        prop_assert!(msg.contains(&dlc.to_string()));
    }

    #[test]
    fn test_error_context_chain_preserves_all(
        op in "op[0-9]+",
        key in "key[0-9]+",
        val in "val[0-9]+"
    ) {
        let ctx = ErrorContext::new(&op).with(&key, &val);
        let msg = ctx.to_string();
        prop_assert!(msg.contains(&op));
        prop_assert!(msg.contains(&key));
        prop_assert!(msg.contains(&val));
    }

    #[test]
    fn test_result_ext_keeps_source_message(available in 0usize..9, op in "[a-z]{1,12}") {
        let result: Result<(), FrameError> = Err(FrameError::too_short(available));
        let err = result.with_context(op.clone()).err();
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        prop_assert!(msg.contains(&op));
        prop_assert!(msg.contains("buffer too short"));
    }
}
