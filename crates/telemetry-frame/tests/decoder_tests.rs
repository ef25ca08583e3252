//! Layout recovery tests over complete buffers.

use trackside_telemetry_frame::{
    BusFrame, FrameError, FrameReader, LayoutPolicy, WireLayout, decode_next, decode_next_with,
    encode_frame, encode_frames,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn collect(reader: FrameReader<'_>) -> Result<Vec<BusFrame>, FrameError> {
    reader.map(|r| r.map(|d| d.frame)).collect()
}

#[test]
fn single_frame_consumes_layout_size() -> TestResult {
    let frame = BusFrame::new(0x006, &[0x10, 0x20, 0x30, 0x40, 0x50])?;
    for (layout, expected) in [
        (WireLayout::Padded24, 24),
        (WireLayout::Packed21, 21),
        (WireLayout::Minimal, 14),
    ] {
        let mut buf = Vec::new();
        encode_frame(&frame, layout, 0xAABB_CCDD, &mut buf);
        let decoded = decode_next(&buf)?;
        assert_eq!(decoded.layout, layout);
        assert_eq!(decoded.consumed, expected);
        assert_eq!(decoded.frame.payload().len(), 5);
        assert_eq!(decoded.frame, frame);
    }
    Ok(())
}

#[test]
fn payload_is_truncated_to_dlc() -> TestResult {
    // A packed frame with dlc 2 but garbage in the padding bytes.
    let mut buf = Vec::new();
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0x009u32.to_le_bytes());
    buf.push(2);
    buf.extend_from_slice(&[0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    buf.extend_from_slice(&[0u8; 4]);

    let decoded = decode_next(&buf)?;
    assert_eq!(decoded.frame.payload(), &[0x01, 0x02]);
    assert_eq!(decoded.frame.word(), 0x0201);
    Ok(())
}

#[test]
fn concatenated_minimal_frames_decode_in_order() -> TestResult {
    let frames = [
        BusFrame::new(0x004, &[1, 0, 2, 0, 3, 0])?,
        BusFrame::new(0x005, &[0xFF, 0xFF])?,
        BusFrame::new(0x007, &[])?,
        BusFrame::new(0x008, &[0; 8])?,
        BusFrame::new(0x009, &[9])?,
    ];
    let buf = encode_frames(&frames, WireLayout::Minimal, 0);

    let decoded = collect(FrameReader::with_layout(&buf, WireLayout::Minimal))?;
    assert_eq!(decoded, frames);
    Ok(())
}

#[test]
fn concatenated_padded_frames_decode_in_auto_mode() -> TestResult {
    let frames = [
        BusFrame::new(0x006, &[1, 2, 3, 4, 5, 6, 7, 8])?,
        BusFrame::new(0x007, &[9, 9])?,
        BusFrame::new(0x009, &[1, 0, 2, 0, 3, 0, 4, 0])?,
    ];
    let buf = encode_frames(&frames, WireLayout::Padded24, 1234);
    assert_eq!(buf.len(), 72);

    let decoded = collect(FrameReader::new(&buf))?;
    assert_eq!(decoded, frames);
    Ok(())
}

#[test]
fn auto_mode_prefers_padded_for_long_minimal_runs() -> TestResult {
    // Length-only detection cannot tell three short minimal frames from one
    // padded frame once 24 or more bytes remain. Pinning the layout is the
    // way to read such streams.
    let frames = [
        BusFrame::new(0x004, &[1])?,
        BusFrame::new(0x005, &[2])?,
        BusFrame::new(0x006, &[3])?,
    ];
    let buf = encode_frames(&frames, WireLayout::Minimal, 0);
    assert_eq!(buf.len(), 30);

    let first = decode_next(&buf)?;
    assert_eq!(first.layout, WireLayout::Padded24);
    assert_eq!(first.frame.bus_id, 0x004);

    let pinned = decode_next_with(&buf, LayoutPolicy::Pinned(WireLayout::Minimal))?;
    assert_eq!(pinned.consumed, 10);
    assert_eq!(pinned.frame.payload(), &[1]);
    Ok(())
}

#[test]
fn short_buffers_fail_as_too_short() -> TestResult {
    for len in 0..9 {
        let buf = vec![0u8; len];
        let err = decode_next(&buf).err();
        assert_eq!(err, Some(FrameError::too_short(len)));
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("buffer too short"), "unexpected message: {msg}");
    }
    Ok(())
}

#[test]
fn declared_dlc_five_with_three_bytes_is_truncated() -> TestResult {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0x005u32.to_le_bytes());
    buf.push(5);
    buf.extend_from_slice(&[1, 2, 3]);

    let err = decode_next(&buf).err();
    assert_eq!(
        err,
        Some(FrameError::TruncatedPayload {
            dlc: 5,
            available: 3
        })
    );
    let msg = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(msg.contains("truncated payload"));
    Ok(())
}

#[test]
fn dlc_above_eight_rejected_in_every_layout() -> TestResult {
    for total in [24usize, 21, 20] {
        let mut buf = vec![0u8; total];
        if let Some(dlc) = buf.get_mut(8) {
            *dlc = 9;
        }
        assert_eq!(
            decode_next(&buf).err(),
            Some(FrameError::InvalidDataLength { dlc: 9 }),
            "buffer of {total} bytes"
        );
    }
    Ok(())
}

#[test]
fn frames_before_failure_are_kept() -> TestResult {
    let good = BusFrame::new(0x007, &[1, 2, 3])?;
    let mut buf = Vec::new();
    encode_frame(&good, WireLayout::Minimal, 0, &mut buf);
    encode_frame(&good, WireLayout::Minimal, 0, &mut buf);
    buf.extend_from_slice(&[0xAB; 4]);

    let results: Vec<_> = FrameReader::with_layout(&buf, WireLayout::Minimal).collect();
    assert_eq!(results.len(), 3);
    for result in results.iter().take(2) {
        assert_eq!(result.map(|d| d.frame), Ok(good));
    }
    assert_eq!(results.get(2).cloned(), Some(Err(FrameError::too_short(4))));
    Ok(())
}

#[test]
fn split_frame_fails_as_truncated() -> TestResult {
    let frame = BusFrame::new(0x008, &[0; 8])?;
    let mut buf = Vec::new();
    encode_frame(&frame, WireLayout::Padded24, 0, &mut buf);
    buf.truncate(15);

    // 15 bytes look like a minimal header declaring 8 bytes with 6 present.
    assert_eq!(
        decode_next(&buf).err(),
        Some(FrameError::TruncatedPayload {
            dlc: 8,
            available: 6
        })
    );
    Ok(())
}

#[test]
fn empty_buffer_yields_nothing() -> TestResult {
    assert_eq!(FrameReader::new(&[]).count(), 0);
    Ok(())
}
