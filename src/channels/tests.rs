use approx::assert_relative_eq;
use ndarray::Array3;

use crate::model::{PixelType, Region, Tile, pack_rgb};
use crate::stains::{ColorDeconvolutionStains, StainsHandle};

use super::{
    ChannelError, ChannelInfo, ColorLut, DisplayWindow, NORMALIZED_OD_CLIP, RgbTransform,
    StainSelector, blend_additive,
};

fn rgb_tile(pixels: Vec<u32>, width: usize) -> Tile {
    let height = pixels.len() / width;
    Tile::from_rgb(width, height, pixels).expect("tile")
}

fn band_tile(values: Vec<f32>, width: usize) -> Tile {
    let height = values.len() / width;
    let bands = Array3::from_shape_vec((1, height, width), values).expect("shape");
    Tile::from_bands(bands).expect("tile")
}

#[test]
fn additive_blend_saturates_each_sub_channel() {
    for a in (0..=255_u32).step_by(17) {
        for b in (0..=255_u32).step_by(15) {
            let acc = pack_rgb(a as u8, 10, 250);
            let own = pack_rgb(b as u8, 20, 10);
            let blended = blend_additive(acc, own);
            assert_eq!(crate::model::red(blended) as u32, (a + b).min(255));
            assert_eq!(crate::model::green(blended), 30);
            assert_eq!(crate::model::blue(blended), 255);
        }
    }
}

#[test]
fn additive_blend_into_empty_accumulator_is_a_plain_write() {
    let own = pack_rgb(12, 34, 56);
    assert_eq!(blend_additive(0, own), own);
    assert_eq!(blend_additive(own, 0), own);
}

#[test]
fn window_enforces_ordered_allowed_range() {
    let mut window = DisplayWindow::new(10.0, 5.0);
    assert_eq!(window.max_allowed(), 11.0);
    window.set_clip_to_allowed(true);
    window.set_min_display(-50.0);
    window.set_max_display(90.0);
    assert_eq!(window.min_display(), 10.0);
    assert_eq!(window.max_display(), 11.0);
}

#[test]
fn window_without_clipping_accepts_any_display_range() {
    let mut window = DisplayWindow::new(0.0, 255.0);
    window.set_min_display(-20.0);
    window.set_max_display(400.0);
    assert_eq!(window.offset(), -20.0);
    assert_relative_eq!(window.scale_to_byte(), 255.0 / 420.0);
}

#[test]
fn collapsed_window_is_a_step_at_the_threshold() {
    let window = DisplayWindow::new(0.0, 255.0).with_display(100.0, 100.0);
    assert_eq!(window.intensity(100.0), 0);
    assert_eq!(window.intensity(99.0), 0);
    assert_eq!(window.intensity(100.5), 255);
}

#[test]
fn solid_lut_scales_color_by_intensity() {
    let lut = ColorLut::solid(pack_rgb(255, 128, 0));
    assert_eq!(lut.get(0), 0);
    assert_eq!(lut.get(255), pack_rgb(255, 128, 0));
    assert_eq!(lut.get(51), pack_rgb(51, 25, 0));
}

#[test]
fn multi_band_maps_through_lut_or_gray() {
    let channel = ChannelInfo::multi_band("Channel 1", 0, pack_rgb(0, 255, 0), PixelType::U8);
    assert!(channel.is_additive());
    assert!(channel.does_something());
    assert_eq!(channel.to_rgb(255.0, true), pack_rgb(0, 255, 0));
    assert_eq!(channel.to_rgb(255.0, false), pack_rgb(255, 255, 255));
    assert_eq!(channel.to_rgb(-5.0, true), 0);
    assert_eq!(channel.to_rgb(1_000.0, false), pack_rgb(255, 255, 255));
}

#[test]
fn multi_band_values_below_minimum_do_not_wash_out() {
    let mut channel = ChannelInfo::multi_band("Channel 2", 0, pack_rgb(255, 0, 0), PixelType::U8);
    channel.window_mut().set_min_display(20.0);
    let acc = pack_rgb(0, 200, 0);
    assert_eq!(channel.update_additive(acc, 20.0, true).expect("additive"), acc);
    let updated = channel.update_additive(acc, 255.0, true).expect("additive");
    assert_eq!(updated, pack_rgb(255, 200, 0));
}

#[test]
fn non_additive_channels_reject_additive_updates() {
    let channel = ChannelInfo::rgb_transform(RgbTransform::Hue);
    let error = channel
        .update_additive(pack_rgb(1, 2, 3), 0.5, true)
        .expect_err("hue is not additive");
    assert!(matches!(error, ChannelError::NotAdditive(name) if name == "Hue"));
}

#[test]
fn settable_color_is_limited_to_multi_band_channels() {
    let mut band = ChannelInfo::multi_band("Channel 1", 0, 0xffffff, PixelType::U16);
    band.set_lut_color(0x0000ff).expect("settable");
    assert_eq!(band.color(), Some(0x0000ff));
    assert_eq!(band.window().max_allowed(), 65_535.0);

    let mut red = ChannelInfo::rgb_transform(RgbTransform::Red);
    assert!(!red.has_settable_color());
    assert!(red.set_lut_color(0x00ff00).is_err());
    assert_eq!(red.color(), Some(0xff0000));
}

#[test]
fn rgb_transforms_compute_expected_values() {
    let rgb = pack_rgb(200, 100, 50);
    assert_eq!(RgbTransform::Red.value(rgb), 200.0);
    assert_relative_eq!(RgbTransform::RgbMean.value(rgb), 350.0 / 3.0);
    assert_relative_eq!(RgbTransform::Saturation.value(rgb), 0.75);
    assert_relative_eq!(RgbTransform::RedChromaticity.value(rgb), 200.0 / 350.0);
    assert_relative_eq!(RgbTransform::Hue.value(pack_rgb(0, 255, 0)), 1.0 / 3.0);
    assert_eq!(RgbTransform::Hue.value(pack_rgb(90, 90, 90)), 0.0);
    assert_eq!(RgbTransform::BlueChromaticity.value(0), 0.0);
}

#[test]
fn rgb_direct_is_identity_for_full_range() {
    let mut channel = ChannelInfo::rgb_direct();
    assert!(!channel.does_something());
    assert!(!channel.is_additive());
    let tile = rgb_tile(vec![pack_rgb(10, 128, 250)], 1);
    assert_eq!(channel.map_pixel(&tile, 0, 0, true), Some(pack_rgb(10, 128, 250)));

    channel.window_mut().set_min_display(0.0);
    channel.window_mut().set_max_display(127.5);
    assert!(channel.does_something());
    assert_eq!(channel.map_pixel(&tile, 0, 0, true), Some(pack_rgb(20, 255, 255)));
}

#[test]
fn extract_values_reads_requested_region() {
    let tile = band_tile(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
    let channel = ChannelInfo::multi_band("Channel 1", 0, 0xffffff, PixelType::F32);
    let values = channel
        .extract_values(&tile, Region::new(1, 0, 2, 2))
        .expect("scalar");
    assert_eq!(values, vec![2.0, 3.0, 5.0, 6.0]);
    assert!(
        ChannelInfo::rgb_direct()
            .extract_values(&tile, Region::new(0, 0, 1, 1))
            .is_none()
    );
}

#[test]
fn fill_and_accumulate_reuse_scratch_buffer() {
    let tile = Tile::from_band_values(2, 1, vec![vec![255.0, 0.0], vec![0.0, 255.0]]).expect("tile");
    let first = ChannelInfo::multi_band("Channel 1", 0, pack_rgb(255, 0, 0), PixelType::U8);
    let second = ChannelInfo::multi_band("Channel 2", 1, pack_rgb(0, 0, 255), PixelType::U8);
    let mut out = vec![0; 2];
    first.fill_rgb(&tile, &mut out, true).expect("fill");
    second.accumulate_rgb(&tile, &mut out, true).expect("accumulate");
    assert_eq!(out, vec![pack_rgb(255, 0, 0), pack_rgb(0, 0, 255)]);
    first.reset_buffers();
    second.reset_buffers();

    let mut wrong = vec![0; 3];
    assert!(first.fill_rgb(&tile, &mut wrong, true).is_err());
}

#[test]
fn stain_channels_follow_current_stains() {
    let handle = StainsHandle::new(None);
    let channel = ChannelInfo::stain_deconvolution(StainSelector::Stain(1), handle.clone());
    assert_eq!(channel.name(), "Stain 2");
    assert_eq!(channel.color(), Some(0xffffff));
    let tile = rgb_tile(vec![pack_rgb(100, 50, 150)], 1);
    assert_eq!(channel.scalar_at(&tile, 0, 0), Some(0.0));

    handle.set(Some(ColorDeconvolutionStains::hematoxylin_eosin()));
    assert_eq!(channel.name(), "Eosin");
    assert_ne!(channel.color(), Some(0xffffff));
    assert_ne!(channel.scalar_at(&tile, 0, 0), Some(0.0));
    assert!(!channel.is_additive());
}

#[test]
fn optical_density_sum_is_zero_for_white() {
    let handle = StainsHandle::new(Some(ColorDeconvolutionStains::hematoxylin_dab()));
    let channel = ChannelInfo::stain_deconvolution(StainSelector::OpticalDensitySum, handle);
    let tile = rgb_tile(vec![pack_rgb(255, 255, 255), pack_rgb(0, 0, 0)], 2);
    assert_relative_eq!(channel.scalar_at(&tile, 0, 0).expect("white"), 0.0);
    assert!(channel.scalar_at(&tile, 1, 0).expect("black") > 5.0);
}

#[test]
fn reconvolution_only_acts_when_stains_differ() {
    let target = ColorDeconvolutionStains::hematoxylin_eosin();
    let handle = StainsHandle::new(Some(target.clone()));
    let channel = ChannelInfo::reconvolution(target, false, handle.clone());
    assert!(!channel.does_something());
    let tile = rgb_tile(vec![pack_rgb(150, 80, 170)], 1);
    assert_eq!(channel.map_pixel(&tile, 0, 0, true), Some(pack_rgb(150, 80, 170)));
    assert_eq!(channel.value_as_string(&tile, 0, 0).as_deref(), Some("150, 80, 170"));

    handle.set(Some(ColorDeconvolutionStains::hematoxylin_dab()));
    assert!(channel.does_something());
    assert_ne!(channel.map_pixel(&tile, 0, 0, true), Some(pack_rgb(150, 80, 170)));
}

#[test]
fn reconvolution_can_drop_the_residual() {
    let target = ColorDeconvolutionStains::hematoxylin_eosin();
    let handle = StainsHandle::new(Some(ColorDeconvolutionStains::hematoxylin_dab()));
    let keep = ChannelInfo::reconvolution(target.clone(), false, handle.clone());
    let drop = ChannelInfo::reconvolution(target, true, handle);
    assert_ne!(keep.name(), drop.name());
    let tile = rgb_tile(vec![pack_rgb(40, 160, 90)], 1);
    assert_ne!(keep.map_pixel(&tile, 0, 0, true), drop.map_pixel(&tile, 0, 0, true));
}

#[test]
fn normalized_od_whitens_background() {
    let channel = ChannelInfo::normalized_optical_density(StainsHandle::new(None));
    assert!(channel.does_something());
    let tile = rgb_tile(vec![pack_rgb(250, 250, 250), pack_rgb(60, 30, 120)], 2);
    assert!(NORMALIZED_OD_CLIP > 0.0);
    assert_eq!(channel.map_pixel(&tile, 0, 0, true), Some(0xffffff));
    assert_ne!(channel.map_pixel(&tile, 1, 0, true), Some(0xffffff));
}

#[test]
fn value_strings_format_scalars() {
    let tile = band_tile(vec![100.0, 0.126], 2);
    let channel = ChannelInfo::multi_band("Channel 1", 0, 0xffffff, PixelType::F32);
    assert_eq!(channel.value_as_string(&tile, 0, 0).as_deref(), Some("100"));
    assert_eq!(channel.value_as_string(&tile, 1, 0).as_deref(), Some("0.13"));
    assert!(channel.value_as_string(&tile, 5, 0).is_none());
}

#[test]
fn map_pixel_rejects_coordinates_outside_the_tile() {
    let tile = rgb_tile(vec![1, 2, 3, 4], 2);
    let direct = ChannelInfo::rgb_direct();
    assert_eq!(direct.map_pixel(&tile, 1, 1, true), Some(4));
    assert_eq!(direct.map_pixel(&tile, 2, 0, true), None);
    assert_eq!(direct.map_pixel(&tile, 0, 2, true), None);

    let od = ChannelInfo::normalized_optical_density(StainsHandle::new(Some(
        ColorDeconvolutionStains::hematoxylin_eosin(),
    )));
    assert_eq!(od.map_pixel(&tile, 2, 0, true), None);

    let bands = band_tile(vec![0.0, 10.0, 20.0, 30.0], 2);
    let band = ChannelInfo::multi_band("Channel 1", 0, 0xffffff, PixelType::U8);
    assert_eq!(band.map_pixel(&bands, 2, 1, true), None);
    assert!(band.map_pixel(&bands, 1, 1, true).is_some());
}
