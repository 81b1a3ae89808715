use ndarray::{Array3, ArrayView2, s};

use super::{CoreError, Region, Result, pack_rgb};

#[derive(Debug, Clone, PartialEq)]
pub enum TilePixels {
    /// Packed `0x00RRGGBB`, row major.
    Rgb(Vec<u32>),
    /// Samples indexed by `(band, y, x)`.
    Bands(Array3<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    width: usize,
    height: usize,
    pixels: TilePixels,
}

impl Tile {
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self> {
        check_dimensions(width, height)?;
        if pixels.len() != width * height {
            return Err(CoreError::TileSizeMismatch {
                width,
                height,
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: TilePixels::Rgb(pixels.into_iter().map(|rgb| rgb & 0x00ff_ffff).collect()),
        })
    }

    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != width * height * 3 {
            return Err(CoreError::TileSizeMismatch {
                width,
                height,
                expected: width * height * 3,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|rgb| pack_rgb(rgb[0], rgb[1], rgb[2]))
            .collect();
        Self::from_rgb(width, height, pixels)
    }

    pub fn from_bands(bands: Array3<f32>) -> Result<Self> {
        let (n_bands, height, width) = bands.dim();
        check_dimensions(width, height)?;
        if n_bands == 0 {
            return Err(CoreError::TileSizeMismatch {
                width,
                height,
                expected: width * height,
                actual: 0,
            });
        }
        Ok(Self {
            width,
            height,
            pixels: TilePixels::Bands(bands),
        })
    }

    pub fn from_band_values(width: usize, height: usize, band_values: Vec<Vec<f32>>) -> Result<Self> {
        let n_bands = band_values.len();
        let mut flat = Vec::with_capacity(n_bands * width * height);
        for band in band_values {
            if band.len() != width * height {
                return Err(CoreError::TileSizeMismatch {
                    width,
                    height,
                    expected: width * height,
                    actual: band.len(),
                });
            }
            flat.extend(band);
        }
        let bands = Array3::from_shape_vec((n_bands, height, width), flat).map_err(|_| {
            CoreError::TileSizeMismatch {
                width,
                height,
                expected: width * height,
                actual: 0,
            }
        })?;
        Self::from_bands(bands)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pixels(&self) -> &TilePixels {
        &self.pixels
    }

    pub fn is_rgb(&self) -> bool {
        matches!(self.pixels, TilePixels::Rgb(_))
    }

    pub fn n_bands(&self) -> usize {
        match &self.pixels {
            TilePixels::Rgb(_) => 3,
            TilePixels::Bands(bands) => bands.dim().0,
        }
    }

    pub fn rgb_pixels(&self) -> Option<&[u32]> {
        match &self.pixels {
            TilePixels::Rgb(pixels) => Some(pixels),
            TilePixels::Bands(_) => None,
        }
    }

    /// Packed RGB at `(x, y)`. Band tiles are read as gray (first band) or as
    /// the first three bands, clamped to 8 bits.
    pub fn rgb_at(&self, x: usize, y: usize) -> u32 {
        match &self.pixels {
            TilePixels::Rgb(pixels) => pixels[y * self.width + x],
            TilePixels::Bands(bands) => {
                let n_bands = bands.dim().0;
                let sample = |band: usize| super::clamp8(bands[[band.min(n_bands - 1), y, x]]);
                if n_bands >= 3 {
                    pack_rgb(sample(0), sample(1), sample(2))
                } else {
                    let gray = sample(0);
                    pack_rgb(gray, gray, gray)
                }
            }
        }
    }

    /// Sample of `band` at `(x, y)`; RGB tiles expose red, green and blue as
    /// bands 0..3.
    pub fn band_value(&self, band: usize, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match &self.pixels {
            TilePixels::Rgb(pixels) => {
                let rgb = pixels[y * self.width + x];
                match band {
                    0 => Some(f32::from(super::red(rgb))),
                    1 => Some(f32::from(super::green(rgb))),
                    2 => Some(f32::from(super::blue(rgb))),
                    _ => None,
                }
            }
            TilePixels::Bands(bands) => bands.get([band, y, x]).copied(),
        }
    }

    pub fn band(&self, band: usize) -> Option<ArrayView2<'_, f32>> {
        match &self.pixels {
            TilePixels::Bands(bands) if band < bands.dim().0 => Some(bands.slice(s![band, .., ..])),
            _ => None,
        }
    }

    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter: Box<dyn Iterator<Item = f32>> = match &self.pixels {
            TilePixels::Rgb(pixels) => Box::new(pixels.iter().flat_map(|rgb| {
                let (r, g, b) = super::unpack_rgb(*rgb);
                [f32::from(r), f32::from(g), f32::from(b)]
            })),
            TilePixels::Bands(bands) => Box::new(bands.iter().copied()),
        };
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for value in iter {
            min = min.min(value);
            max = max.max(value);
        }
        Some((min, max))
    }
}

impl Tile {
    /// Copies `region` out of the tile.
    pub fn crop(&self, region: Region) -> Result<Self> {
        if region.x + region.width > self.width || region.y + region.height > self.height {
            return Err(CoreError::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                image_width: self.width,
                image_height: self.height,
            });
        }
        let (x_end, y_end) = (region.x + region.width, region.y + region.height);
        match &self.pixels {
            TilePixels::Rgb(pixels) => {
                let mut cropped = Vec::with_capacity(region.width * region.height);
                for y in region.y..y_end {
                    let start = y * self.width;
                    cropped.extend_from_slice(&pixels[start + region.x..start + x_end]);
                }
                Self::from_rgb(region.width, region.height, cropped)
            }
            TilePixels::Bands(bands) => {
                Self::from_bands(bands.slice(s![.., region.y..y_end, region.x..x_end]).to_owned())
            }
        }
    }

    /// Nearest-neighbour subsampling keeping every `step`-th pixel.
    pub fn subsample(&self, step: usize) -> Self {
        if step <= 1 {
            return self.clone();
        }
        let width = self.width.div_ceil(step);
        let height = self.height.div_ceil(step);
        let pixels = match &self.pixels {
            TilePixels::Rgb(pixels) => TilePixels::Rgb(
                (0..height)
                    .flat_map(|y| (0..width).map(move |x| (x * step, y * step)))
                    .map(|(x, y)| pixels[y * self.width + x])
                    .collect(),
            ),
            TilePixels::Bands(bands) => {
                TilePixels::Bands(bands.slice(s![.., ..;step, ..;step]).to_owned())
            }
        };
        Self {
            width,
            height,
            pixels,
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::ZeroSizedTile { width, height });
    }
    Ok(())
}
