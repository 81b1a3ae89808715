use std::sync::Arc;

use crate::display::{DISPLAY_PROPERTY_KEY, ImageDisplay};
use crate::model::{
    ImageData, ImageType, MemoryImageServer, MemoryPropertyStore, PixelType, PropertyStore, Tile,
};

use super::{ChannelDisplayState, apply_legacy_colors, legacy_color_key, to_json, update_from_json};

fn fluorescence_data(path: &str) -> ImageData {
    let bands = (0..3)
        .map(|band| (0..16).map(|index| (index * 40 + band * 7) as f32).collect())
        .collect();
    let tile = Tile::from_band_values(4, 4, bands).expect("tile");
    let server = MemoryImageServer::new(path, PixelType::U16, vec![tile]).expect("server");
    ImageData::new(Arc::new(server), ImageType::Fluorescence)
}

fn loaded(data: ImageData) -> ImageDisplay {
    let mut display = ImageDisplay::default();
    display.set_image(Some(data));
    display
}

type ChannelSummary = (f32, f32, Option<u32>, bool);

fn summary(display: &ImageDisplay) -> Vec<ChannelSummary> {
    display
        .channels()
        .iter()
        .enumerate()
        .map(|(index, channel)| {
            (
                channel.min_display(),
                channel.max_display(),
                channel.color(),
                display.is_selected(index),
            )
        })
        .collect()
}

#[test]
fn serialized_records_use_camel_case_fields() {
    let display = loaded(fluorescence_data("memory://json"));
    let json = to_json(display.channels(), display.selected()).expect("json");
    let records: Vec<serde_json::Value> = serde_json::from_str(&json).expect("parse");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["name"], "Channel 1");
    assert_eq!(records[0]["implementationId"], "multi-band");
    assert_eq!(records[0]["color"], 0xff0000);
    assert_eq!(records[2]["selected"], true);
    assert!(records[0].get("minDisplay").is_some());
}

#[test]
fn round_trip_is_idempotent() {
    let mut display = loaded(fluorescence_data("memory://round-trip"));
    display.set_min_max_display(0, 5.0, 99.5).expect("range");
    display.set_lut_color(1, 0x123456).expect("color");
    display.set_channel_selected(2, false).expect("toggle");
    let before = summary(&display);

    let json = to_json(display.channels(), display.selected()).expect("json");
    let matched = update_from_json(&mut display, &json).expect("apply");
    assert_eq!(matched, 3);
    assert_eq!(summary(&display), before);
    assert_eq!(to_json(display.channels(), display.selected()).expect("json"), json);
}

#[test]
fn unmatched_records_are_ignored() {
    let mut display = loaded(fluorescence_data("memory://unmatched"));
    let json = r#"[
        {"name": "Eosin", "implementationId": "stain-deconvolution", "minDisplay": 0.1, "selected": true},
        {"name": "Channel 2", "implementationId": "rgb-transform", "minDisplay": 7.0, "selected": false},
        {"name": "Channel 3", "class": "multi-band", "minDisplay": 9.0, "maxDisplay": 10.0, "selected": true}
    ]"#;
    let before = display.channels()[1].min_display();
    assert_eq!(update_from_json(&mut display, json).expect("apply"), 1);
    assert_eq!(display.channels()[1].min_display(), before);
    assert_eq!(display.channels()[2].min_display(), 9.0);
    assert_eq!(display.channels()[2].max_display(), 10.0);
    assert_eq!(display.selected(), &[0, 1, 2]);
}

#[test]
fn records_without_implementation_id_match_by_name() {
    let mut display = loaded(fluorescence_data("memory://by-name"));
    let records = vec![
        ChannelDisplayState {
            name: "Channel 1".into(),
            implementation_id: None,
            min_display: None,
            max_display: Some(42.0),
            color: Some(-16_776_961),
            selected: false,
        },
    ];
    let json = serde_json::to_string(&records).expect("json");
    assert!(!json.contains("implementationId"));
    assert_eq!(update_from_json(&mut display, &json).expect("apply"), 1);
    assert_eq!(display.channels()[0].max_display(), 42.0);
    assert_eq!(display.channels()[0].color(), Some(0x0000ff));
    assert_eq!(display.selected(), &[1, 2]);
}

#[test]
fn malformed_state_changes_nothing() {
    let mut display = loaded(fluorescence_data("memory://malformed"));
    let before = summary(&display);
    let stamp = display.change_timestamp();
    assert!(update_from_json(&mut display, "{\"name\": ").is_err());
    assert_eq!(summary(&display), before);
    assert_eq!(display.change_timestamp(), stamp);
}

#[test]
fn legacy_colors_apply_to_settable_channels_only() {
    let data = fluorescence_data("memory://legacy");
    data.properties()
        .set_property(&legacy_color_key("Channel 1"), "-256".into());
    data.properties()
        .set_property(&legacy_color_key("Channel 3"), "not a color".into());
    let display = loaded(data.clone());
    assert_eq!(display.channels()[0].color(), Some(0xffff00));
    assert_eq!(display.channels()[2].color(), Some(0x0000ff));
    assert!(data.properties().get_property(DISPLAY_PROPERTY_KEY).is_some());
}

#[test]
fn legacy_colors_leave_ranges_alone() {
    let mut display = loaded(fluorescence_data("memory://legacy-ranges"));
    display.set_min_max_display(1, 1.0, 2.0).expect("range");
    let properties = MemoryPropertyStore::new();
    properties.set_property(&legacy_color_key("Channel 2"), "16711935".into());
    assert_eq!(apply_legacy_colors(&mut display, &properties), 1);
    let channel = &display.channels()[1];
    assert_eq!(channel.color(), Some(0xff00ff));
    assert_eq!((channel.min_display(), channel.max_display()), (1.0, 2.0));
}

#[test]
fn malformed_persisted_state_falls_back_to_legacy_colors() {
    let data = fluorescence_data("memory://fallback");
    data.properties()
        .set_property(DISPLAY_PROPERTY_KEY, "[{\"name\": 3}]".into());
    data.properties()
        .set_property(&legacy_color_key("Channel 2"), "65280".into());
    data.properties()
        .set_property(&legacy_color_key("Channel 1"), "255".into());
    let display = loaded(data);
    assert_eq!(display.channels()[0].color(), Some(0x0000ff));
    assert_eq!(display.channels()[1].color(), Some(0x00ff00));
}
