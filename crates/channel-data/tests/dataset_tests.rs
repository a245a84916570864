//! Integration tests for dataset decoding and channel resolution.

use channel_data::{
    resolve_channel, Calibration, ChannelDataError, ChannelLayer, Dataset, DatasetHeader,
    LogicalChannel, RawData, Sensor, SensorChannelMap,
};
use chrono::{TimeZone, Utc};
use icecover_common::GridReference;
use projection::ProjectionSpec;

fn dataset(sensor: Sensor, names: &[&str]) -> Dataset {
    let header = DatasetHeader::new(
        "test",
        sensor,
        Utc.with_ymd_and_hms(2023, 6, 21, 10, 30, 0).unwrap(),
        GridReference::new(1.0, 1.0, 0.0, 0.0, 2, 2).unwrap(),
    );
    let layers = names
        .iter()
        .map(|n| ChannelLayer::new(*n, RawData::U16(vec![1; 4]), Calibration::default()))
        .collect();
    Dataset::new(header, layers).unwrap()
}

// ============================================================================
// Channel resolution
// ============================================================================

#[test]
fn test_resolve_avhrr_channels() {
    let ds = dataset(Sensor::Avhrr, &["ch1", "ch2", "ch3b", "ch4", "ch5"]);
    let map = SensorChannelMap::resolve(&ds);

    assert_eq!(map.ch1, Some(0));
    assert_eq!(map.ch2, Some(1));
    assert_eq!(map.ch3a, None);
    assert_eq!(map.ch3b, Some(2));
    assert_eq!(map.ch4, Some(3));
    assert_eq!(map.ch5, Some(4));
    assert!(map.require_core().is_ok());
}

#[test]
fn test_resolve_viirs_channels() {
    let ds = dataset(Sensor::Viirs, &["M16", "M15", "M12", "M10", "M07", "M05"]);
    let map = SensorChannelMap::resolve(&ds);

    assert_eq!(map.get(LogicalChannel::Ch1), Some(5));
    assert_eq!(map.get(LogicalChannel::Ch2), Some(4));
    assert_eq!(map.get(LogicalChannel::Ch3a), Some(3));
    assert_eq!(map.get(LogicalChannel::Ch3b), Some(2));
    assert_eq!(map.get(LogicalChannel::Ch4), Some(1));
    assert_eq!(map.get(LogicalChannel::Ch5), Some(0));
}

#[test]
fn test_sensor_naming_does_not_cross_over() {
    // AVHRR names in a dataset labelled VIIRS resolve to nothing
    let ds = dataset(Sensor::Viirs, &["ch1", "ch2", "ch4"]);
    let map = SensorChannelMap::resolve(&ds);
    assert_eq!(map.ch1, None);

    let err = map.require_core().unwrap_err();
    match err {
        ChannelDataError::MissingChannel { sensor, channels } => {
            assert_eq!(sensor, "viirs");
            assert!(channels.contains("M05"));
            assert!(channels.contains("M15"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_first_matching_layer_wins() {
    let ds = dataset(Sensor::Avhrr, &["ch4 corrected", "ch4"]);
    assert_eq!(resolve_channel(&ds, LogicalChannel::Ch4), Some(0));
}

#[test]
fn test_ch3_prefix_is_not_ch3a() {
    let ds = dataset(Sensor::Avhrr, &["ch3", "ch3b"]);
    assert_eq!(resolve_channel(&ds, LogicalChannel::Ch3a), None);
    assert_eq!(resolve_channel(&ds, LogicalChannel::Ch3b), Some(1));
}

// ============================================================================
// JSON decoding
// ============================================================================

#[test]
fn test_dataset_from_json() {
    let json = r#"{
        "header": {
            "platform": "NOAA-19",
            "sensor": "AVHRR/3",
            "acquired": "2024-03-01T12:00:00Z",
            "grid": {
                "pixel_size_x": 1.0, "pixel_size_y": 1.0,
                "origin_x": -600.0, "origin_y": -2900.0,
                "width": 2, "height": 1
            },
            "projection": "wgs84"
        },
        "layers": [
            {"description": "ch4", "data": {"type": "i16", "values": [0, 1500]},
             "calibration": {"gain": 0.01, "intercept": 250.0}, "missing": 0}
        ]
    }"#;

    let ds = Dataset::from_json_str(json).unwrap();
    assert_eq!(ds.header.sensor, Sensor::Avhrr);
    assert_eq!(ds.header.projection, ProjectionSpec::Wgs84);
    assert_eq!(ds.header.day_of_year(), 61);

    let ch4 = ds.layer(resolve_channel(&ds, LogicalChannel::Ch4).unwrap()).unwrap();
    assert_eq!(ch4.physical(0), None);
    assert!((ch4.physical(1).unwrap() - 265.0).abs() < 1e-9);
}

#[test]
fn test_dataset_from_json_rejects_short_layer() {
    let json = r#"{
        "header": {
            "platform": "NOAA-19", "sensor": "avhrr", "acquired": "2024-03-01T12:00:00Z",
            "grid": {"pixel_size_x": 1.0, "pixel_size_y": 1.0, "origin_x": 0.0,
                     "origin_y": 0.0, "width": 2, "height": 2}
        },
        "layers": [{"description": "ch1", "data": {"type": "u8", "values": [1, 2, 3]}}]
    }"#;

    let err = Dataset::from_json_str(json).unwrap_err();
    assert!(matches!(err, ChannelDataError::LayerSizeMismatch { .. }));
}

#[test]
fn test_dataset_from_json_rejects_bad_grid() {
    let json = r#"{
        "header": {
            "platform": "NOAA-19", "sensor": "avhrr", "acquired": "2024-03-01T12:00:00Z",
            "grid": {"pixel_size_x": 0.0, "pixel_size_y": 1.0, "origin_x": 0.0,
                     "origin_y": 0.0, "width": 1, "height": 1}
        },
        "layers": []
    }"#;

    let err = Dataset::from_json_str(json).unwrap_err();
    assert!(matches!(err, ChannelDataError::Grid(_)));
}

#[test]
fn test_dataset_from_json_rejects_unknown_sensor() {
    let json = r#"{
        "header": {
            "platform": "Terra", "sensor": "modis", "acquired": "2024-03-01T12:00:00Z",
            "grid": {"pixel_size_x": 1.0, "pixel_size_y": 1.0, "origin_x": 0.0,
                     "origin_y": 0.0, "width": 1, "height": 1}
        },
        "layers": []
    }"#;

    assert!(matches!(
        Dataset::from_json_str(json),
        Err(ChannelDataError::Json(_))
    ));
}
