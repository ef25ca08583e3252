//! Wire layout variants and layout selection.

use core::fmt;
use core::str::FromStr;

use trackside_errors::frame::MIN_HEADER_LEN;

// Header offsets shared by every layout.
pub(crate) const OFF_FLAGS: usize = 0;
pub(crate) const OFF_ID: usize = 4;
pub(crate) const OFF_DLC: usize = 8;

const PADDED_DATA_OFFSET: usize = 12; // after 3 reserved bytes
const PACKED_DATA_OFFSET: usize = 9;

/// One of the byte layouts a forwarded bus frame may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireLayout {
    /// 24 bytes: header, 3 reserved bytes, 8 data bytes, timestamp.
    Padded24,
    /// 21 bytes: header, 8 data bytes, timestamp.
    Packed21,
    /// 9 + dlc bytes: header followed by exactly `dlc` data bytes.
    Minimal,
}

impl WireLayout {
    /// All layouts in automatic-detection priority order.
    pub const PRIORITY: [WireLayout; 3] = [
        WireLayout::Padded24,
        WireLayout::Packed21,
        WireLayout::Minimal,
    ];

    /// Fixed encoded size, or `None` for the dlc-sized minimal layout.
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            WireLayout::Padded24 => Some(24),
            WireLayout::Packed21 => Some(21),
            WireLayout::Minimal => None,
        }
    }

    /// Smallest buffer that can start a frame in this layout.
    pub const fn min_len(self) -> usize {
        match self.fixed_len() {
            Some(len) => len,
            None => MIN_HEADER_LEN,
        }
    }

    /// Encoded size of a frame carrying `dlc` data bytes.
    pub const fn encoded_len(self, dlc: u8) -> usize {
        match self.fixed_len() {
            Some(len) => len,
            None => MIN_HEADER_LEN + dlc as usize,
        }
    }

    /// Offset of the first data byte.
    pub const fn data_offset(self) -> usize {
        match self {
            WireLayout::Padded24 => PADDED_DATA_OFFSET,
            WireLayout::Packed21 | WireLayout::Minimal => PACKED_DATA_OFFSET,
        }
    }

    /// Pick the layout for `remaining` bytes: first match in priority order.
    pub fn detect(remaining: usize) -> Option<WireLayout> {
        Self::PRIORITY
            .into_iter()
            .find(|layout| remaining >= layout.min_len())
    }

    /// Short lowercase name used in configuration and CLI output.
    pub const fn name(self) -> &'static str {
        match self {
            WireLayout::Padded24 => "padded",
            WireLayout::Packed21 => "packed",
            WireLayout::Minimal => "minimal",
        }
    }
}

impl fmt::Display for WireLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WireLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "padded" | "padded24" => Ok(WireLayout::Padded24),
            "packed" | "packed21" => Ok(WireLayout::Packed21),
            "minimal" => Ok(WireLayout::Minimal),
            other => Err(format!(
                "unknown wire layout '{other}', expected padded, packed or minimal"
            )),
        }
    }
}

/// How a decoder chooses the layout of each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutPolicy {
    /// Pick the largest layout that fits the remaining bytes.
    #[default]
    Auto,
    /// Every frame in the stream uses this layout.
    Pinned(WireLayout),
}

impl LayoutPolicy {
    /// Resolve the layout for a frame starting with `remaining` bytes.
    pub fn resolve(self, remaining: usize) -> Option<WireLayout> {
        match self {
            LayoutPolicy::Auto => WireLayout::detect(remaining),
            LayoutPolicy::Pinned(layout) => Some(layout),
        }
    }
}

impl fmt::Display for LayoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPolicy::Auto => f.write_str("auto"),
            LayoutPolicy::Pinned(layout) => layout.fmt(f),
        }
    }
}

impl FromStr for LayoutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(LayoutPolicy::Auto)
        } else {
            s.parse().map(LayoutPolicy::Pinned)
        }
    }
}
