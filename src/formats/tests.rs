use std::fs::File;

use image::{ImageBuffer, Luma, Rgb, Rgba};
use tempfile::tempdir;
use tiff::encoder::{TiffEncoder, colortype};

use super::{DefaultImageCodec, ImageReader, IoError, RasterWriter, read_image, write_png};
use crate::model::{ImageServer, PixelType, Region, pack_rgb};
use crate::render::RgbRaster;

#[test]
fn eight_bit_color_reads_as_packed_rgb() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("color.png");
    let mut image = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(2, 1);
    image.put_pixel(0, 0, Rgb([255, 0, 0]));
    image.put_pixel(1, 0, Rgb([10, 20, 30]));
    image.save(&path).expect("save png");

    let server = read_image(&path).expect("read png");
    assert!(server.is_rgb());
    assert_eq!(server.n_channels(), 3);
    assert_eq!(server.pixel_type(), PixelType::U8);
    let tile = server.read_tile(Region::new(0, 0, 2, 1), 0).expect("tile");
    assert_eq!(tile.rgb_pixels(), Some(&[pack_rgb(255, 0, 0), pack_rgb(10, 20, 30)][..]));
}

#[test]
fn alpha_is_dropped() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("alpha.png");
    let image = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
    image.save(&path).expect("save png");
    let server = read_image(&path).expect("read png");
    let tile = server.default_thumbnail(0).expect("thumbnail");
    assert_eq!(tile.rgb_at(0, 0), pack_rgb(1, 2, 3));
}

#[test]
fn grayscale_keeps_raw_values_in_one_band() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("gray.png");
    let image =
        ImageBuffer::<Luma<u16>, Vec<u16>>::from_vec(2, 2, vec![0, 500, 1000, 65_535]).expect("image");
    image.save(&path).expect("save png");

    let server = read_image(&path).expect("read png");
    assert!(!server.is_rgb());
    assert_eq!(server.n_channels(), 1);
    assert_eq!(server.pixel_type(), PixelType::U16);
    let tile = server.default_thumbnail(0).expect("thumbnail");
    assert_eq!(tile.band_value(0, 1, 0), Some(500.0));
    assert_eq!(tile.band_value(0, 1, 1), Some(65_535.0));
}

#[test]
fn tiff_pages_become_z_slices() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("stack.tiff");
    {
        let file = File::create(&path).expect("create");
        let mut encoder = TiffEncoder::new(file).expect("encoder");
        encoder
            .write_image::<colortype::Gray16>(2, 1, &[1, 2])
            .expect("page 0");
        encoder
            .write_image::<colortype::Gray16>(2, 1, &[300, 400])
            .expect("page 1");
    }

    let server = read_image(&path).expect("read tiff");
    assert_eq!(server.n_z_slices(), 2);
    assert_eq!(server.n_channels(), 1);
    assert_eq!(server.pixel_type(), PixelType::U16);
    let second = server.default_thumbnail(1).expect("slice");
    assert_eq!(second.band_value(0, 1, 0), Some(400.0));
    assert!(server.default_thumbnail(2).is_err());
}

#[test]
fn float_tiff_keeps_values() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("float.tif");
    {
        let file = File::create(&path).expect("create");
        let mut encoder = TiffEncoder::new(file).expect("encoder");
        encoder
            .write_image::<colortype::Gray32Float>(2, 1, &[-0.5, 2.5])
            .expect("page");
    }
    let server = read_image(&path).expect("read tiff");
    assert_eq!(server.pixel_type(), PixelType::F32);
    let tile = server.default_thumbnail(0).expect("slice");
    assert_eq!(tile.min_max(), Some((-0.5, 2.5)));
}

#[test]
fn composited_raster_writes_png() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("out.png");
    let mut raster = RgbRaster::new(3, 2);
    raster.pixels_mut()[4] = pack_rgb(9, 8, 7);
    write_png(&path, &raster).expect("write png");

    let restored = image::open(&path).expect("open").to_rgb8();
    assert_eq!(restored.dimensions(), (3, 2));
    assert_eq!(restored.get_pixel(1, 1).0, [9, 8, 7]);
    assert_eq!(restored.get_pixel(0, 0).0, [0, 0, 0]);
}

#[test]
fn unsupported_extensions_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let err = read_image(dir.path().join("image.bmpx")).expect_err("must fail");
    assert!(matches!(err, IoError::UnsupportedFormat(ext) if ext == "bmpx"));
    let err = write_png(dir.path().join("out.tiff"), &RgbRaster::new(1, 1)).expect_err("must fail");
    assert!(matches!(err, IoError::UnsupportedFormat(_)));
}

#[test]
fn default_codec_reads_everything_but_writes_png_only() {
    let codec = DefaultImageCodec;
    assert!(ImageReader::supports_extension(&codec, "tif"));
    assert!(ImageReader::supports_extension(&codec, "jpeg"));
    assert!(RasterWriter::supports_extension(&codec, "png"));
    assert!(!RasterWriter::supports_extension(&codec, "tiff"));
}
