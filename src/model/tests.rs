use std::sync::Arc;

use ndarray::Array3;

use super::{
    CoreError, ImageData, ImageServer, ImageType, MemoryImageServer, MemoryPropertyStore,
    PixelType, PropertyStore, Region, Tile, clamp8, default_channel_color, pack_rgb, unpack_rgb,
};

fn gradient_tile(width: usize, height: usize) -> Tile {
    let pixels = (0..width * height)
        .map(|index| pack_rgb(index as u8, 0, 255 - index as u8))
        .collect();
    Tile::from_rgb(width, height, pixels).expect("tile")
}

#[test]
fn packing_ignores_alpha_bits() {
    let rgb = pack_rgb(1, 2, 3);
    assert_eq!(rgb, 0x010203);
    assert_eq!(unpack_rgb(rgb | 0xff00_0000), (1, 2, 3));
    let tile = Tile::from_rgb(1, 1, vec![0xff11_2233]).expect("tile");
    assert_eq!(tile.rgb_at(0, 0), 0x112233);
}

#[test]
fn clamp8_rounds_and_saturates() {
    assert_eq!(clamp8(f32::NAN), 0);
    assert_eq!(clamp8(-3.0), 0);
    assert_eq!(clamp8(127.6), 128);
    assert_eq!(clamp8(300.0), 255);
}

#[test]
fn tile_rejects_mismatched_buffers() {
    let error = Tile::from_rgb(2, 2, vec![0; 3]).expect_err("mismatch");
    assert!(matches!(error, CoreError::TileSizeMismatch { expected: 4, actual: 3, .. }));
    assert!(matches!(
        Tile::from_rgb(0, 2, Vec::new()),
        Err(CoreError::ZeroSizedTile { .. })
    ));
    assert!(Tile::from_rgb_bytes(1, 1, &[1, 2]).is_err());
}

#[test]
fn band_tiles_expose_samples_and_gray_rgb() {
    let bands = Array3::from_shape_vec((2, 1, 2), vec![10.0, 300.0, 1.0, 2.0]).expect("shape");
    let tile = Tile::from_bands(bands).expect("tile");
    assert_eq!(tile.n_bands(), 2);
    assert_eq!(tile.band_value(1, 1, 0), Some(2.0));
    assert_eq!(tile.band_value(2, 0, 0), None);
    assert_eq!(tile.rgb_at(1, 0), pack_rgb(255, 255, 255));
    assert_eq!(tile.min_max(), Some((1.0, 300.0)));
}

#[test]
fn rgb_tiles_expose_components_as_bands() {
    let tile = Tile::from_rgb_bytes(1, 1, &[9, 8, 7]).expect("tile");
    assert_eq!(tile.band_value(0, 0, 0), Some(9.0));
    assert_eq!(tile.band_value(2, 0, 0), Some(7.0));
    assert_eq!(tile.band_value(3, 0, 0), None);
}

#[test]
fn crop_and_subsample_keep_layout() {
    let tile = gradient_tile(4, 3);
    let cropped = tile.crop(Region::new(1, 1, 2, 2)).expect("crop");
    assert_eq!(cropped.rgb_pixels().expect("rgb")[0], tile.rgb_at(1, 1));
    assert!(tile.crop(Region::new(3, 0, 2, 1)).is_err());

    let small = tile.subsample(2);
    assert_eq!((small.width(), small.height()), (2, 2));
    assert_eq!(small.rgb_at(1, 1), tile.rgb_at(2, 2));
}

#[test]
fn memory_server_serves_slices() {
    let server =
        MemoryImageServer::new("memory://stack", PixelType::U8, vec![gradient_tile(4, 3); 3])
            .expect("server");
    assert_eq!(server.n_z_slices(), 3);
    assert_eq!(server.n_channels(), 3);
    assert!(server.is_rgb());
    assert_eq!(server.bits_per_pixel(), 8);
    let tile = server.read_tile(Region::new(0, 0, 2, 1), 2).expect("tile");
    assert_eq!(tile.len(), 2);
    assert!(matches!(
        server.default_thumbnail(3),
        Err(CoreError::SliceOutOfRange { z: 3, n_z: 3 })
    ));
}

#[test]
fn memory_server_rejects_inconsistent_slices() {
    let result = MemoryImageServer::new(
        "memory://bad",
        PixelType::U8,
        vec![gradient_tile(4, 3), gradient_tile(3, 3)],
    );
    assert!(result.is_err());
    assert!(MemoryImageServer::new("memory://empty", PixelType::U8, Vec::new()).is_err());
}

#[test]
fn default_channel_colors_cycle() {
    assert_eq!(default_channel_color(0), 0xff0000);
    assert_eq!(default_channel_color(7), 0x00ff00);
    let gray = Tile::from_band_values(1, 1, vec![vec![1.0]]).expect("tile");
    let server = MemoryImageServer::new("memory://gray", PixelType::U16, vec![gray])
        .expect("server")
        .with_channel_names(vec!["DAPI".into()]);
    assert_eq!(server.default_channel_color(0), 0xffffff);
    assert_eq!(server.channel_name(0).as_deref(), Some("DAPI"));
    assert_eq!(server.channel_name(1), None);
}

#[test]
fn property_store_round_trips_values() {
    let store = MemoryPropertyStore::new();
    store.set_property("a", "1".into());
    store.set_property("b", "2".into());
    assert_eq!(store.get_property("a").as_deref(), Some("1"));
    assert_eq!(store.remove_property("a").as_deref(), Some("1"));
    assert_eq!(store.keys(), vec!["b".to_string()]);
}

#[test]
fn image_type_selects_stain_presets() {
    let server: Arc<dyn ImageServer> = Arc::new(
        MemoryImageServer::new("memory://he", PixelType::U8, vec![gradient_tile(2, 2)])
            .expect("server"),
    );
    let mut data = ImageData::new(server, ImageType::BrightfieldHE);
    assert!(data.is_brightfield());
    let stains = data.stains().stains().expect("preset");
    assert_eq!(stains.name(), "H&E default");

    let before = data.stains().version();
    data.set_image_type(ImageType::Fluorescence);
    assert!(data.stains().stains().is_none());
    assert!(data.stains().version() > before);
    assert!(!ImageType::BrightfieldOther.has_recognized_stain_preset());
}

#[test]
fn image_type_serializes_snake_case() {
    let json = serde_json::to_string(&ImageType::BrightfieldHDab).expect("serialize");
    assert_eq!(json, "\"brightfield_h_dab\"");
    let parsed: ImageType = serde_json::from_str("\"fluorescence\"").expect("parse");
    assert_eq!(parsed, ImageType::Fluorescence);
}
