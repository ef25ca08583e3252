//! Bus frame boundary recovery for controller telemetry buffers.
//!
//! The on-car controller forwards every received bus frame as the raw bytes
//! of its in-memory frame record. Depending on the firmware toolchain that
//! record is packed in one of three ways, so a receiver has to recover frame
//! boundaries from buffer length alone.
//!
//! # Wire layouts
//!
//! All integers are little-endian.
//!
//! | Layout     | Size      | Bytes                                                         |
//! |------------|-----------|---------------------------------------------------------------|
//! | `Padded24` | 24        | flags(4) id(4) dlc(1) reserved(3) data(8) timestamp(4)        |
//! | `Packed21` | 21        | flags(4) id(4) dlc(1) data(8) timestamp(4)                    |
//! | `Minimal`  | 9 + dlc   | flags(4) id(4) dlc(1) data(dlc)                               |
//!
//! In automatic mode the largest layout that fits the remaining bytes wins.
//! Only the low `dlc` data bytes are meaningful; the rest is padding and is
//! zeroed in the decoded frame. The timestamp is never used.
//!
//! # Usage
//!
//! ```rust
//! use trackside_telemetry_frame::{BusFrame, FrameReader, WireLayout, encode_frame};
//!
//! let mut buf = Vec::new();
//! let frame = BusFrame::new(0x007, &[0x01, 0x00, 0x00])?;
//! encode_frame(&frame, WireLayout::Padded24, 0, &mut buf);
//!
//! let frames: Vec<_> = FrameReader::new(&buf).collect::<Result<_, _>>()?;
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].frame.payload(), &[0x01, 0x00, 0x00]);
//! # Ok::<(), trackside_errors::FrameError>(())
//! ```

#![deny(static_mut_refs)]

pub mod decoder;
pub mod encode;
pub mod frame;
pub mod layout;

pub use decoder::{FrameReader, decode_next, decode_next_with};
pub use encode::{encode_frame, encode_frames};
pub use frame::{BusFrame, DecodedFrame};
pub use layout::{LayoutPolicy, WireLayout};
pub use trackside_errors::FrameError;
pub use trackside_errors::frame::{MAX_DLC, MIN_HEADER_LEN};
