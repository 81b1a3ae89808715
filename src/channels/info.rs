use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::model::{PixelType, Region, Tile, blue, green, pack_rgb, red};
use crate::stains::{ColorDeconvolutionStains, OdLuts, StainsHandle};

use super::stain::{DeconvolutionContext, default_od_luts, normalized_od_pixel};
use super::{
    ChannelError, ColorLut, DisplayWindow, Result, RgbTransform, StainSelector, blend_additive,
};

const RGB_DIRECT_ID: &str = "rgb-direct";
const RGB_TRANSFORM_ID: &str = "rgb-transform";
const STAIN_DECONVOLUTION_ID: &str = "stain-deconvolution";
const RECONVOLUTION_ID: &str = "reconvolution";
const NORMALIZED_OD_ID: &str = "normalized-od";
const MULTI_BAND_ID: &str = "multi-band";

#[derive(Debug, Clone)]
pub enum ChannelKind {
    /// Packed RGB shown as-is, or with each sub-channel rescaled through the window.
    RgbDirect,
    RgbTransform {
        transform: RgbTransform,
        lut: Option<Arc<ColorLut>>,
    },
    StainDeconvolution {
        selector: StainSelector,
        stains: StainsHandle,
    },
    Reconvolution {
        target: Arc<ColorDeconvolutionStains>,
        discard_residual: bool,
        stains: StainsHandle,
    },
    NormalizedOpticalDensity {
        stains: StainsHandle,
    },
    /// One raw band of a multi-channel image with an assignable colour.
    MultiBand {
        band: usize,
        lut: Arc<ColorLut>,
    },
}

impl ChannelKind {
    pub fn implementation_id(&self) -> &'static str {
        match self {
            Self::RgbDirect => RGB_DIRECT_ID,
            Self::RgbTransform { .. } => RGB_TRANSFORM_ID,
            Self::StainDeconvolution { .. } => STAIN_DECONVOLUTION_ID,
            Self::Reconvolution { .. } => RECONVOLUTION_ID,
            Self::NormalizedOpticalDensity { .. } => NORMALIZED_OD_ID,
            Self::MultiBand { .. } => MULTI_BAND_ID,
        }
    }

    /// Whether outputs follow the image's current stains.
    pub fn depends_on_stains(&self) -> bool {
        matches!(
            self,
            Self::StainDeconvolution { .. }
                | Self::Reconvolution { .. }
                | Self::NormalizedOpticalDensity { .. }
        )
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::RgbTransform { .. } | Self::StainDeconvolution { .. } | Self::MultiBand { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub name: String,
    pub implementation_id: &'static str,
}

impl ChannelKey {
    /// Whether histograms under this key were computed through the stains.
    pub fn depends_on_stains(&self) -> bool {
        matches!(
            self.implementation_id,
            STAIN_DECONVOLUTION_ID | RECONVOLUTION_ID | NORMALIZED_OD_ID
        )
    }
}

/// Reusable storage for extracted values; clones start empty.
#[derive(Debug, Default)]
struct ScratchBuffer(Mutex<Vec<f32>>);

impl Clone for ScratchBuffer {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl ScratchBuffer {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<f32>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone)]
pub struct ChannelInfo {
    label: String,
    /// Disambiguates channels whose names would otherwise repeat.
    name_suffix: Option<usize>,
    window: DisplayWindow,
    kind: ChannelKind,
    scratch: ScratchBuffer,
}

enum ScalarSource {
    Transform(RgbTransform),
    Stain(StainSelector, Option<DeconvolutionContext>),
    Band(usize),
}

impl ScalarSource {
    fn value(&self, tile: &Tile, x: usize, y: usize) -> f32 {
        match self {
            Self::Transform(transform) => transform.value(tile.rgb_at(x, y)),
            Self::Stain(selector, context) => context
                .as_ref()
                .map(|context| context.value(*selector, tile.rgb_at(x, y)))
                .unwrap_or(0.0),
            Self::Band(band) => tile.band_value(*band, x, y).unwrap_or(0.0),
        }
    }
}

enum DirectSource<'a> {
    Passthrough,
    Rescale(&'a DisplayWindow),
    Reconvolve {
        context: DeconvolutionContext,
        target: &'a ColorDeconvolutionStains,
        discard_residual: bool,
    },
    NormalizedOd(OdLuts),
}

impl DirectSource<'_> {
    fn map(&self, rgb: u32) -> u32 {
        match self {
            Self::Passthrough => rgb,
            Self::Rescale(window) => pack_rgb(
                window.rescale_byte(red(rgb)),
                window.rescale_byte(green(rgb)),
                window.rescale_byte(blue(rgb)),
            ),
            Self::Reconvolve {
                context,
                target,
                discard_residual,
            } => context.reconvolve(target, *discard_residual, rgb),
            Self::NormalizedOd(luts) => normalized_od_pixel(luts, rgb),
        }
    }
}

impl ChannelInfo {
    fn with_kind(label: impl Into<String>, window: DisplayWindow, kind: ChannelKind) -> Self {
        Self {
            label: label.into(),
            name_suffix: None,
            window,
            kind,
            scratch: ScratchBuffer::default(),
        }
    }

    pub fn rgb_direct() -> Self {
        Self::with_kind("Original", DisplayWindow::new(0.0, 255.0), ChannelKind::RgbDirect)
    }

    pub fn rgb_transform(transform: RgbTransform) -> Self {
        let lut = transform.lut_color().map(|color| Arc::new(ColorLut::solid(color)));
        Self::with_kind(
            transform.name(),
            DisplayWindow::new(0.0, transform.max_allowed()),
            ChannelKind::RgbTransform { transform, lut },
        )
    }

    pub fn stain_deconvolution(selector: StainSelector, stains: StainsHandle) -> Self {
        Self::with_kind(
            selector.placeholder_name(),
            selector.default_window(),
            ChannelKind::StainDeconvolution { selector, stains },
        )
    }

    pub fn reconvolution(
        target: ColorDeconvolutionStains,
        discard_residual: bool,
        stains: StainsHandle,
    ) -> Self {
        let label = if discard_residual {
            format!("Reconvolved ({}, no residual)", target.name())
        } else {
            format!("Reconvolved ({})", target.name())
        };
        Self::with_kind(
            label,
            DisplayWindow::new(0.0, 255.0),
            ChannelKind::Reconvolution {
                target: Arc::new(target),
                discard_residual,
                stains,
            },
        )
    }

    pub fn normalized_optical_density(stains: StainsHandle) -> Self {
        Self::with_kind(
            "Normalized OD colors",
            DisplayWindow::new(0.0, 255.0),
            ChannelKind::NormalizedOpticalDensity { stains },
        )
    }

    pub fn multi_band(
        name: impl Into<String>,
        band: usize,
        color: u32,
        pixel_type: PixelType,
    ) -> Self {
        Self::with_kind(
            name,
            DisplayWindow::new(0.0, pixel_type.max_value()),
            ChannelKind::MultiBand {
                band,
                lut: Arc::new(ColorLut::solid(color)),
            },
        )
    }

    /// Stain channels take their name from the current stains on every call.
    pub fn name(&self) -> Cow<'_, str> {
        let base = match &self.kind {
            ChannelKind::StainDeconvolution { selector, stains } => {
                Cow::Owned(selector.name(stains.stains().as_deref()))
            }
            _ => Cow::Borrowed(self.label.as_str()),
        };
        match self.name_suffix {
            Some(suffix) => Cow::Owned(format!("{base} ({suffix})")),
            None => base,
        }
    }

    /// Appends ` (suffix)` to the name, including for stain-named channels.
    pub(crate) fn set_name_suffix(&mut self, suffix: Option<usize>) {
        self.name_suffix = suffix;
    }

    pub fn key(&self) -> ChannelKey {
        ChannelKey {
            name: self.name().into_owned(),
            implementation_id: self.implementation_id(),
        }
    }

    pub fn kind(&self) -> &ChannelKind {
        &self.kind
    }

    pub fn implementation_id(&self) -> &'static str {
        self.kind.implementation_id()
    }

    pub fn window(&self) -> &DisplayWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut DisplayWindow {
        &mut self.window
    }

    pub fn min_display(&self) -> f32 {
        self.window.min_display()
    }

    pub fn max_display(&self) -> f32 {
        self.window.max_display()
    }

    pub fn is_additive(&self) -> bool {
        match &self.kind {
            ChannelKind::RgbTransform { transform, .. } => transform.is_additive(),
            ChannelKind::MultiBand { .. } => true,
            _ => false,
        }
    }

    pub fn supports_histogram(&self) -> bool {
        self.kind.is_scalar()
    }

    /// Whether rendering this channel alone changes the raw pixels.
    pub fn does_something(&self) -> bool {
        match &self.kind {
            ChannelKind::RgbDirect => !self.window.is_byte_range(),
            ChannelKind::Reconvolution { target, stains, .. } => stains
                .stains()
                .is_some_and(|current| !current.has_same_vectors(target)),
            _ => true,
        }
    }

    /// Predominant LUT colour, if the channel is rendered in one.
    pub fn color(&self) -> Option<u32> {
        match &self.kind {
            ChannelKind::RgbTransform { lut, .. } => lut.as_ref().map(|lut| lut.color()),
            ChannelKind::StainDeconvolution { selector, stains } => {
                Some(selector.color(stains.stains().as_deref()))
            }
            ChannelKind::MultiBand { lut, .. } => Some(lut.color()),
            _ => None,
        }
    }

    pub fn has_settable_color(&self) -> bool {
        matches!(self.kind, ChannelKind::MultiBand { .. })
    }

    pub fn set_lut_color(&mut self, color: u32) -> Result<()> {
        match &mut self.kind {
            ChannelKind::MultiBand { lut, .. } => {
                *lut = Arc::new(ColorLut::solid(color));
                Ok(())
            }
            _ => Err(ChannelError::ColorNotSettable(self.name().into_owned())),
        }
    }

    pub fn reset_buffers(&self) {
        *self.scratch.lock() = Vec::new();
    }

    fn lut(&self) -> Option<Cow<'_, ColorLut>> {
        match &self.kind {
            ChannelKind::RgbTransform { lut, .. } => lut.as_deref().map(Cow::Borrowed),
            ChannelKind::MultiBand { lut, .. } => Some(Cow::Borrowed(lut.as_ref())),
            ChannelKind::StainDeconvolution { selector, stains } => Some(Cow::Owned(
                ColorLut::solid(selector.color(stains.stains().as_deref())),
            )),
            _ => None,
        }
    }

    fn scalar_source(&self) -> Option<ScalarSource> {
        match &self.kind {
            ChannelKind::RgbTransform { transform, .. } => Some(ScalarSource::Transform(*transform)),
            ChannelKind::StainDeconvolution { selector, stains } => Some(ScalarSource::Stain(
                *selector,
                DeconvolutionContext::resolve(stains),
            )),
            ChannelKind::MultiBand { band, .. } => Some(ScalarSource::Band(*band)),
            _ => None,
        }
    }

    fn direct_source(&self) -> Option<DirectSource<'_>> {
        match &self.kind {
            ChannelKind::RgbDirect if self.does_something() => {
                Some(DirectSource::Rescale(&self.window))
            }
            ChannelKind::RgbDirect => Some(DirectSource::Passthrough),
            ChannelKind::Reconvolution {
                target,
                discard_residual,
                stains,
            } => Some(
                DeconvolutionContext::resolve(stains)
                    .filter(|context| !context.stains().has_same_vectors(target))
                    .map(|context| DirectSource::Reconvolve {
                        context,
                        target: target.as_ref(),
                        discard_residual: *discard_residual,
                    })
                    .unwrap_or(DirectSource::Passthrough),
            ),
            ChannelKind::NormalizedOpticalDensity { stains } => {
                let luts = stains
                    .stains()
                    .map(|stains| stains.od_luts())
                    .unwrap_or_else(default_od_luts);
                Some(DirectSource::NormalizedOd(luts))
            }
            _ => None,
        }
    }

    /// Scalar value at one pixel, `None` for channels that map RGB directly.
    pub fn scalar_at(&self, tile: &Tile, x: usize, y: usize) -> Option<f32> {
        if x >= tile.width() || y >= tile.height() {
            return None;
        }
        self.scalar_source().map(|source| source.value(tile, x, y))
    }

    pub fn extract_values(&self, tile: &Tile, region: Region) -> Option<Vec<f32>> {
        let mut values = Vec::new();
        let extracted = self.extract_values_into(tile, region, &mut values);
        extracted.then_some(values)
    }

    /// Fills `values` row by row with the channel's values inside `region`,
    /// clipped to the tile. Returns `false` for non-scalar channels.
    pub fn extract_values_into(&self, tile: &Tile, region: Region, values: &mut Vec<f32>) -> bool {
        let Some(source) = self.scalar_source() else {
            return false;
        };
        let x_end = (region.x + region.width).min(tile.width());
        let y_end = (region.y + region.height).min(tile.height());
        values.clear();
        values.reserve(x_end.saturating_sub(region.x) * y_end.saturating_sub(region.y));
        for y in region.y..y_end {
            for x in region.x..x_end {
                values.push(source.value(tile, x, y));
            }
        }
        true
    }

    pub fn to_rgb(&self, value: f32, use_lut: bool) -> u32 {
        let lut = if use_lut { self.lut() } else { None };
        self.rgb_with_lut(value, lut.as_deref())
    }

    fn rgb_with_lut(&self, value: f32, lut: Option<&ColorLut>) -> u32 {
        let intensity = self.window.intensity(value);
        match lut {
            Some(lut) => lut.get(intensity),
            None => pack_rgb(intensity, intensity, intensity),
        }
    }

    /// Adds this channel's colour for `value` onto `acc`.
    ///
    /// Values at or below `min_display` leave the accumulator unchanged.
    pub fn update_additive(&self, acc: u32, value: f32, use_lut: bool) -> Result<u32> {
        if !self.is_additive() {
            return Err(ChannelError::NotAdditive(self.name().into_owned()));
        }
        let lut = if use_lut { self.lut() } else { None };
        Ok(self.additive_with_lut(acc, value, lut.as_deref()))
    }

    fn additive_with_lut(&self, acc: u32, value: f32, lut: Option<&ColorLut>) -> u32 {
        if value <= self.window.min_display() {
            return acc;
        }
        blend_additive(acc, self.rgb_with_lut(value, lut))
    }

    /// Display colour of one pixel of `tile`, `None` outside the tile.
    pub fn map_pixel(&self, tile: &Tile, x: usize, y: usize, use_lut: bool) -> Option<u32> {
        if x >= tile.width() || y >= tile.height() {
            return None;
        }
        if let Some(direct) = self.direct_source() {
            return Some(direct.map(tile.rgb_at(x, y)));
        }
        let value = self.scalar_at(tile, x, y).unwrap_or(0.0);
        Some(self.to_rgb(value, use_lut))
    }

    /// Writes the display colour of every pixel of `tile` into `out`.
    pub fn fill_rgb(&self, tile: &Tile, out: &mut [u32], use_lut: bool) -> Result<()> {
        self.check_buffer(tile, out.len())?;
        if let Some(direct) = self.direct_source() {
            let width = tile.width();
            out.par_iter_mut().enumerate().for_each(|(index, pixel)| {
                *pixel = direct.map(tile.rgb_at(index % width, index / width));
            });
            return Ok(());
        }
        let lut = if use_lut { self.lut() } else { None };
        let mut values = self.scratch.lock();
        self.extract_values_into(tile, full_region(tile), &mut values);
        out.par_iter_mut()
            .zip(values.par_iter())
            .for_each(|(pixel, value)| *pixel = self.rgb_with_lut(*value, lut.as_deref()));
        Ok(())
    }

    /// Accumulates this channel onto an already written buffer.
    pub fn accumulate_rgb(&self, tile: &Tile, acc: &mut [u32], use_lut: bool) -> Result<()> {
        if !self.is_additive() {
            return Err(ChannelError::NotAdditive(self.name().into_owned()));
        }
        self.check_buffer(tile, acc.len())?;
        let lut = if use_lut { self.lut() } else { None };
        let mut values = self.scratch.lock();
        self.extract_values_into(tile, full_region(tile), &mut values);
        acc.par_iter_mut()
            .zip(values.par_iter())
            .for_each(|(pixel, value)| *pixel = self.additive_with_lut(*pixel, *value, lut.as_deref()));
        Ok(())
    }

    /// Raw value at a pixel as text: the scalar value, or the RGB components
    /// for channels that map RGB directly.
    pub fn value_as_string(&self, tile: &Tile, x: usize, y: usize) -> Option<String> {
        if x >= tile.width() || y >= tile.height() {
            return None;
        }
        match self.scalar_at(tile, x, y) {
            Some(value) => Some(format_value(value)),
            None => {
                let rgb = tile.rgb_at(x, y);
                Some(format!("{}, {}, {}", red(rgb), green(rgb), blue(rgb)))
            }
        }
    }

    fn check_buffer(&self, tile: &Tile, actual: usize) -> Result<()> {
        if actual != tile.len() {
            return Err(ChannelError::BufferSizeMismatch {
                name: self.name().into_owned(),
                expected: tile.len(),
                actual,
            });
        }
        Ok(())
    }
}

fn full_region(tile: &Tile) -> Region {
    Region::new(0, 0, tile.width(), tile.height())
}

fn format_value(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
