//! Property tests: values packed at documented offsets decode unchanged.

use proptest::prelude::*;
use trackside_telemetry_schema::{FieldValue, PayloadBuilder, Schema, SchemaVersion, ids};

fn decoded(schema: &Schema, bus_id: u32, payload: &[u8], name: &str) -> Option<FieldValue> {
    let id = schema.field_id(name)?;
    schema
        .decode(bus_id, payload)?
        .values
        .into_iter()
        .find(|(field, _)| *field == id)
        .map(|(_, v)| v)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_wheel_fields_round_trip(
        wheels in proptest::array::uniform4(0u64..2048),
        encoder in 0u64..1024,
    ) {
        let schema = Schema::new(SchemaVersion::Logger)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let [fl, fr, rl, rr] = wheels;
        let payload = PayloadBuilder::new()
            .bits(0, 11, fl)
            .bits(11, 11, fr)
            .bits(22, 11, rl)
            .bits(33, 11, rr)
            .bits(44, 10, encoder)
            .build();
        for (name, v) in [("RPM_FL", fl), ("RPM_FR", fr), ("RPM_RL", rl), ("RPM_RR", rr), ("ENC_ANGLE", encoder)] {
            let expected = i64::try_from(v).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(decoded(&schema, ids::PROX_ENCODER, &payload, name), Some(FieldValue::Integer(expected)));
        }
    }

    #[test]
    fn prop_dashboard_rpm_is_floor_mean(wheels in proptest::array::uniform4(0u64..2048)) {
        let schema = Schema::new(SchemaVersion::Dashboard)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let [fl, fr, bl, br] = wheels;
        let payload = PayloadBuilder::new()
            .bits(0, 11, fl)
            .bits(11, 11, fr)
            .bits(22, 11, bl)
            .bits(33, 11, br)
            .build();
        let mean = i64::try_from((fl + fr + bl + br) / 4).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded(&schema, ids::PROX_ENCODER, &payload, "RPM"), Some(FieldValue::Integer(mean)));
    }

    #[test]
    fn prop_temperatures_round_trip(temps in proptest::array::uniform4(any::<i16>())) {
        let schema = Schema::new(SchemaVersion::Logger)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let [a, b, c, d] = temps;
        let payload = PayloadBuilder::new().i16(0, a).i16(2, b).i16(4, c).i16(6, d).build();
        for (name, v) in [("Temp_FL", a), ("Temp_FR", b), ("Temp_RL", c), ("Temp_RR", d)] {
            prop_assert_eq!(decoded(&schema, ids::TEMP, &payload, name), Some(FieldValue::Integer(v.into())));
        }
    }

    #[test]
    fn prop_gps_round_trip_to_six_decimals(lon in -180.0f32..180.0, lat in -90.0f32..90.0) {
        let schema = Schema::new(SchemaVersion::Logger)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let payload = PayloadBuilder::new().f32(0, lon).f32(4, lat).build();
        prop_assert_eq!(
            decoded(&schema, ids::GPS_LATLONG, &payload, "GPS_Long"),
            Some(FieldValue::Text(format!("{:.6}", f64::from(lon))))
        );
        prop_assert_eq!(
            decoded(&schema, ids::GPS_LATLONG, &payload, "GPS_Lat"),
            Some(FieldValue::Text(format!("{:.6}", f64::from(lat))))
        );
    }

    /// Decoding arbitrary payloads for any identifier never panics.
    #[test]
    fn prop_random_payload_no_panic(
        bus_id in 0u32..0x010,
        payload in proptest::collection::vec(any::<u8>(), 0..=8),
    ) {
        for version in SchemaVersion::ALL {
            let schema = Schema::new(version).map_err(|e| TestCaseError::fail(e.to_string()))?;
            if let Some(out) = schema.decode(bus_id, &payload) {
                prop_assert!(out.values.len() + out.skipped > 0);
            }
        }
    }
}
