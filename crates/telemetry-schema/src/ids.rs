//! Bus identifiers assigned by the controller firmware.

/// Inertial orientation: three i16 angles.
pub const IMU_ANGLE: u32 = 0x004;

/// Inertial acceleration: two or three i16 axes.
pub const IMU_ACCEL: u32 = 0x005;

/// ADC board: four suspension channels and two pressure channels.
pub const ADC: u32 = 0x006;

/// Proximity sensors and steering encoder: wheel counters, angle, speed.
pub const PROX_ENCODER: u32 = 0x007;

/// GPS fix: longitude then latitude as f32.
pub const GPS_LATLONG: u32 = 0x008;

/// Tyre temperatures: four i16 corners.
pub const TEMP: u32 = 0x009;

/// Every identifier the firmware emits, in ascending order.
pub const ALL: [u32; 6] = [IMU_ANGLE, IMU_ACCEL, ADC, PROX_ENCODER, GPS_LATLONG, TEMP];

/// Short role name for a known identifier.
pub fn role_name(bus_id: u32) -> Option<&'static str> {
    match bus_id {
        IMU_ANGLE => Some("imu_angle"),
        IMU_ACCEL => Some("imu_accel"),
        ADC => Some("adc"),
        PROX_ENCODER => Some("prox_encoder"),
        GPS_LATLONG => Some("gps_latlong"),
        TEMP => Some("temp"),
        _ => None,
    }
}
