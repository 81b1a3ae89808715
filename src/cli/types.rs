use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::display::SeedReport;
use crate::model::ImageType;

#[derive(Debug, Parser)]
#[command(
    name = "display",
    version,
    about = "Composites multi-channel images through configurable display channels"
)]
pub(super) struct Cli {
    /// YAML or JSON display settings.
    #[arg(long, global = true)]
    pub(super) settings: Option<PathBuf>,

    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Prints the channel catalog of an image as JSON.
    Channels {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = ImageTypeArg::Unset)]
        image_type: ImageTypeArg,
    },
    /// Composites the selected channels into an RGB PNG.
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Channel to select, by name. Repeat to composite several.
        #[arg(long = "channel")]
        channels: Vec<String>,
        #[arg(long, value_enum, default_value_t = ImageTypeArg::Unset)]
        image_type: ImageTypeArg,
        /// Display state to apply before rendering.
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        save_state: Option<PathBuf>,
        /// Re-run autorange on every channel with this saturation.
        #[arg(long)]
        saturation: Option<f64>,
    },
    /// Prints the raw channel values at one pixel.
    Value {
        input: PathBuf,
        #[arg(long)]
        x: usize,
        #[arg(long)]
        y: usize,
        #[arg(long = "channel")]
        channels: Vec<String>,
        #[arg(long, value_enum, default_value_t = ImageTypeArg::Unset)]
        image_type: ImageTypeArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(super) enum ImageTypeArg {
    Unset,
    Fluorescence,
    BrightfieldHE,
    BrightfieldHDab,
    BrightfieldOther,
    Other,
}

impl From<ImageTypeArg> for ImageType {
    fn from(value: ImageTypeArg) -> Self {
        match value {
            ImageTypeArg::Unset => Self::Unset,
            ImageTypeArg::Fluorescence => Self::Fluorescence,
            ImageTypeArg::BrightfieldHE => Self::BrightfieldHE,
            ImageTypeArg::BrightfieldHDab => Self::BrightfieldHDab,
            ImageTypeArg::BrightfieldOther => Self::BrightfieldOther,
            ImageTypeArg::Other => Self::Other,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ChannelRow {
    pub(super) index: usize,
    pub(super) name: String,
    pub(super) implementation_id: &'static str,
    pub(super) additive: bool,
    pub(super) selected: bool,
    pub(super) min_display: f32,
    pub(super) max_display: f32,
    pub(super) color: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CatalogInfo {
    pub(super) source: String,
    pub(super) image_type: ImageType,
    pub(super) channels: Vec<ChannelRow>,
    pub(super) seed: Option<SeedReport>,
}
