//! Static decode-rule tables.
//!
//! Each rule maps one bus identifier's payload to a disjoint set of named
//! fields. Tables are plain data; [`crate::Schema`] validates and indexes
//! them at startup.

use crate::bits::{bits_covered, bytes_covered, extract_bits, payload_word, read_f32_le, read_i16_le};
use crate::field::FieldValue;
use crate::ids;

/// How one field is pulled out of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// Unsigned bit field of the zero-extended 64-bit word.
    Bits {
        /// Least significant bit
        offset: u32,
        /// Field width in bits
        width: u32,
    },
    /// Signed 16-bit little-endian value.
    I16 {
        /// Byte offset
        byte: usize,
    },
    /// Single-precision float rendered with fixed decimals.
    F32 {
        /// Byte offset
        byte: usize,
        /// Digits after the decimal point
        decimals: usize,
    },
    /// Floor mean of four equal-width bit fields.
    BitsMean {
        /// Least significant bit of each input
        offsets: [u32; 4],
        /// Width of every input
        width: u32,
    },
    /// Mean of four i16 values rendered with fixed decimals.
    I16Mean {
        /// Byte offset of each input
        bytes: [usize; 4],
        /// Digits after the decimal point
        decimals: usize,
    },
}

impl Extract {
    /// Whether `payload_len` bytes cover every input of this field.
    pub fn covered_by(&self, payload_len: usize) -> bool {
        match *self {
            Extract::Bits { offset, width } => bits_covered(offset, width, payload_len),
            Extract::I16 { byte } => bytes_covered(byte, 2, payload_len),
            Extract::F32 { byte, .. } => bytes_covered(byte, 4, payload_len),
            Extract::BitsMean { offsets, width } => offsets
                .iter()
                .all(|&offset| bits_covered(offset, width, payload_len)),
            Extract::I16Mean { bytes, .. } => {
                bytes.iter().all(|&byte| bytes_covered(byte, 2, payload_len))
            }
        }
    }

    /// Whether this extraction stays inside an 8-byte payload.
    pub fn fits_payload(&self) -> bool {
        self.covered_by(8)
    }

    /// Decode the field, or `None` when the payload is too short for it.
    pub fn decode(&self, payload: &[u8]) -> Option<FieldValue> {
        if !self.covered_by(payload.len()) {
            return None;
        }
        match *self {
            Extract::Bits { offset, width } => {
                let raw = extract_bits(payload_word(payload), offset, width);
                i64::try_from(raw).ok().map(FieldValue::Integer)
            }
            Extract::I16 { byte } => read_i16_le(payload, byte).map(|v| FieldValue::Integer(v.into())),
            Extract::F32 { byte, decimals } => read_f32_le(payload, byte)
                .map(|v| FieldValue::Text(format!("{:.*}", decimals, f64::from(v)))),
            Extract::BitsMean { offsets, width } => {
                let word = payload_word(payload);
                let sum = offsets
                    .iter()
                    .map(|&offset| u128::from(extract_bits(word, offset, width)))
                    .sum::<u128>();
                i64::try_from(sum / 4).ok().map(FieldValue::Integer)
            }
            Extract::I16Mean { bytes, decimals } => {
                let mut sum = 0i32;
                for byte in bytes {
                    sum = sum.saturating_add(i32::from(read_i16_le(payload, byte)?));
                }
                let mean = f64::from(sum) / 4.0;
                Some(FieldValue::Text(format!("{mean:.decimals$}")))
            }
        }
    }
}

/// One field written by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Schema field name
    pub field: &'static str,
    /// Extraction applied to the payload
    pub extract: Extract,
}

/// Decode rule for one bus identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDef {
    /// Owning bus identifier
    pub bus_id: u32,
    /// Fields this identifier writes
    pub fields: &'static [FieldRule],
}

const fn bits(field: &'static str, offset: u32, width: u32) -> FieldRule {
    FieldRule {
        field,
        extract: Extract::Bits { offset, width },
    }
}

const fn int16(field: &'static str, byte: usize) -> FieldRule {
    FieldRule {
        field,
        extract: Extract::I16 { byte },
    }
}

const fn float(field: &'static str, byte: usize, decimals: usize) -> FieldRule {
    FieldRule {
        field,
        extract: Extract::F32 { byte, decimals },
    }
}

// Wheel counters share one layout in every schema.
const WHEEL_WIDTH: u32 = 11;
const WHEEL_OFFSETS: [u32; 4] = [0, 11, 22, 33];
const ENCODER_OFFSET: u32 = 44;
const ENCODER_WIDTH: u32 = 10;
const SPEED_OFFSET: u32 = 54;
const SPEED_WIDTH: u32 = 8;
const ADC_WIDTH: u32 = 10;
const PRESSURE_1_OFFSET: u32 = 40;
const PRESSURE_2_OFFSET: u32 = 50;

/// Pit-wall dashboard fields, in display order.
pub const DASHBOARD_FIELDS: &[&str] = &[
    "Speed (km/h)",
    "RPM",
    "Accelerator (%)",
    "Brake Pedal (%)",
    "Encoder",
    "Temperature (°C)",
    "Battery (%)",
    "Longitude",
    "Latitude",
    "FR Wheel Speed",
    "FL Wheel Speed",
    "BR Wheel Speed",
    "BL Wheel Speed",
    "Lateral G (g)",
    "Longitudinal G (g)",
];

/// Dashboard decode rules. Orientation frames are not shown on the dashboard.
pub const DASHBOARD_RULES: &[RuleDef] = &[
    RuleDef {
        bus_id: ids::PROX_ENCODER,
        fields: &[
            bits("FL Wheel Speed", 0, WHEEL_WIDTH),
            bits("FR Wheel Speed", 11, WHEEL_WIDTH),
            bits("BL Wheel Speed", 22, WHEEL_WIDTH),
            bits("BR Wheel Speed", 33, WHEEL_WIDTH),
            bits("Encoder", ENCODER_OFFSET, ENCODER_WIDTH),
            bits("Speed (km/h)", SPEED_OFFSET, SPEED_WIDTH),
            FieldRule {
                field: "RPM",
                extract: Extract::BitsMean {
                    offsets: WHEEL_OFFSETS,
                    width: WHEEL_WIDTH,
                },
            },
        ],
    },
    RuleDef {
        bus_id: ids::ADC,
        fields: &[
            bits("Battery (%)", 0, ADC_WIDTH),
            bits("Accelerator (%)", PRESSURE_1_OFFSET, ADC_WIDTH),
            bits("Brake Pedal (%)", PRESSURE_2_OFFSET, ADC_WIDTH),
        ],
    },
    RuleDef {
        bus_id: ids::IMU_ACCEL,
        fields: &[int16("Longitudinal G (g)", 0), int16("Lateral G (g)", 2)],
    },
    RuleDef {
        bus_id: ids::GPS_LATLONG,
        fields: &[float("Longitude", 0, 5), float("Latitude", 4, 5)],
    },
    RuleDef {
        bus_id: ids::TEMP,
        fields: &[FieldRule {
            field: "Temperature (°C)",
            extract: Extract::I16Mean {
                bytes: [0, 2, 4, 6],
                decimals: 1,
            },
        }],
    },
];

/// On-car logger fields, in column order.
pub const LOGGER_FIELDS: &[&str] = &[
    "SUS_1",
    "SUS_2",
    "SUS_3",
    "SUS_4",
    "PRESSURE_1",
    "PRESSURE_2",
    "RPM_FL",
    "RPM_FR",
    "RPM_RL",
    "RPM_RR",
    "ENC_ANGLE",
    "IMU_Ang_X",
    "IMU_Ang_Y",
    "IMU_Ang_Z",
    "IMU_Accel_X",
    "IMU_Accel_Y",
    "IMU_Accel_Z",
    "Temp_FL",
    "Temp_FR",
    "Temp_RL",
    "Temp_RR",
    "GPS_Long",
    "GPS_Lat",
];

/// Logger decode rules: every identifier, per-corner temperatures.
pub const LOGGER_RULES: &[RuleDef] = &[
    RuleDef {
        bus_id: ids::IMU_ANGLE,
        fields: &[
            int16("IMU_Ang_X", 0),
            int16("IMU_Ang_Y", 2),
            int16("IMU_Ang_Z", 4),
        ],
    },
    RuleDef {
        bus_id: ids::IMU_ACCEL,
        fields: &[
            int16("IMU_Accel_X", 0),
            int16("IMU_Accel_Y", 2),
            int16("IMU_Accel_Z", 4),
        ],
    },
    RuleDef {
        bus_id: ids::ADC,
        fields: &[
            bits("SUS_1", 0, ADC_WIDTH),
            bits("SUS_2", 10, ADC_WIDTH),
            bits("SUS_3", 20, ADC_WIDTH),
            bits("SUS_4", 30, ADC_WIDTH),
            bits("PRESSURE_1", PRESSURE_1_OFFSET, ADC_WIDTH),
            bits("PRESSURE_2", PRESSURE_2_OFFSET, ADC_WIDTH),
        ],
    },
    RuleDef {
        bus_id: ids::PROX_ENCODER,
        fields: &[
            bits("RPM_FL", 0, WHEEL_WIDTH),
            bits("RPM_FR", 11, WHEEL_WIDTH),
            bits("RPM_RL", 22, WHEEL_WIDTH),
            bits("RPM_RR", 33, WHEEL_WIDTH),
            bits("ENC_ANGLE", ENCODER_OFFSET, ENCODER_WIDTH),
        ],
    },
    RuleDef {
        bus_id: ids::GPS_LATLONG,
        fields: &[float("GPS_Long", 0, 6), float("GPS_Lat", 4, 6)],
    },
    RuleDef {
        bus_id: ids::TEMP,
        fields: &[
            int16("Temp_FL", 0),
            int16("Temp_FR", 2),
            int16("Temp_RL", 4),
            int16("Temp_RR", 6),
        ],
    },
];
