//! Push-callback producer sharing state and counters with another producer.

use std::sync::Arc;
use std::thread;

use trackside_telemetry_frame::{BusFrame, WireLayout, encode_frames};
use trackside_telemetry_ingest::PushIngest;
use trackside_telemetry_schema::{FieldValue, PayloadBuilder, SchemaVersion, ids};
use trackside_telemetry_state::{IngestCounters, TelemetryAggregator};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn message_payload_updates_state() -> TestResult {
    let aggregator = Arc::new(TelemetryAggregator::new(SchemaVersion::Dashboard)?);
    let push = PushIngest::new(Arc::clone(&aggregator));

    let payload = encode_frames(
        &[BusFrame::new(ids::ADC, &PayloadBuilder::new().bits(0, 10, 90).bits(40, 10, 300).build())?],
        WireLayout::Packed21,
        0,
    );
    let report = push.on_message("car/telemetry", &payload);
    assert!(report.is_clean());
    assert_eq!(report.applied, 1);

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.get("Battery (%)"), Some(&FieldValue::Integer(90)));
    assert_eq!(snapshot.get("Accelerator (%)"), Some(&FieldValue::Integer(300)));
    Ok(())
}

#[test]
fn callbacks_from_two_threads_share_counters() -> TestResult {
    let aggregator = Arc::new(TelemetryAggregator::new(SchemaVersion::Logger)?);
    let counters = Arc::new(IngestCounters::new());
    let push = PushIngest::new(Arc::clone(&aggregator)).with_counters(Arc::clone(&counters));

    let accel = encode_frames(&[BusFrame::new(ids::IMU_ACCEL, &[1, 0, 2, 0, 3, 0])?], WireLayout::Padded24, 0);
    let angle = encode_frames(&[BusFrame::new(ids::IMU_ANGLE, &[4, 0, 5, 0, 6, 0])?], WireLayout::Padded24, 0);

    let workers: Vec<_> = [accel, angle]
        .into_iter()
        .map(|payload| {
            let push = push.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    push.on_message("bench", &payload);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().map_err(|_| "worker panicked")?;
    }

    let counts = counters.snapshot();
    assert_eq!(counts.buffers, 200);
    assert_eq!(counts.frames_applied, 200);
    assert_eq!(aggregator.updates(), 200);
    assert_eq!(aggregator.snapshot().get("IMU_Ang_Z"), Some(&FieldValue::Integer(6)));
    Ok(())
}
