use super::{CoreError, ImageServer, PixelType, Region, Result, Tile};

/// Longest thumbnail side produced by [`MemoryImageServer::default_thumbnail`].
pub const THUMBNAIL_MAX_SIDE: usize = 1024;

/// Image server backed by fully decoded Z slices.
#[derive(Debug, Clone)]
pub struct MemoryImageServer {
    path: String,
    pixel_type: PixelType,
    slices: Vec<Tile>,
    channel_names: Vec<String>,
}

impl MemoryImageServer {
    /// All slices must share the first slice's size and layout.
    pub fn new(path: impl Into<String>, pixel_type: PixelType, slices: Vec<Tile>) -> Result<Self> {
        let Some(first) = slices.first() else {
            return Err(CoreError::Source("image has no slices".to_string()));
        };
        let (width, height, rgb, n_bands) =
            (first.width(), first.height(), first.is_rgb(), first.n_bands());
        for slice in &slices[1..] {
            if slice.width() != width
                || slice.height() != height
                || slice.is_rgb() != rgb
                || slice.n_bands() != n_bands
            {
                return Err(CoreError::TileSizeMismatch {
                    width,
                    height,
                    expected: width * height * n_bands,
                    actual: slice.len() * slice.n_bands(),
                });
            }
        }
        Ok(Self {
            path: path.into(),
            pixel_type,
            slices,
            channel_names: Vec::new(),
        })
    }

    pub fn with_channel_names(mut self, names: Vec<String>) -> Self {
        self.channel_names = names;
        self
    }

    pub fn slice(&self, z: usize) -> Result<&Tile> {
        self.slices.get(z).ok_or(CoreError::SliceOutOfRange {
            z,
            n_z: self.slices.len(),
        })
    }

    fn first(&self) -> &Tile {
        &self.slices[0]
    }
}

impl ImageServer for MemoryImageServer {
    fn path(&self) -> &str {
        &self.path
    }

    fn width(&self) -> usize {
        self.first().width()
    }

    fn height(&self) -> usize {
        self.first().height()
    }

    fn n_channels(&self) -> usize {
        self.first().n_bands()
    }

    fn n_z_slices(&self) -> usize {
        self.slices.len()
    }

    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn is_rgb(&self) -> bool {
        self.first().is_rgb()
    }

    fn read_tile(&self, region: Region, z: usize) -> Result<Tile> {
        self.slice(z)?.crop(region)
    }

    fn default_thumbnail(&self, z: usize) -> Result<Tile> {
        let slice = self.slice(z)?;
        let longest = slice.width().max(slice.height());
        Ok(slice.subsample(longest.div_ceil(THUMBNAIL_MAX_SIDE)))
    }

    fn channel_name(&self, channel: usize) -> Option<String> {
        self.channel_names.get(channel).cloned()
    }
}
