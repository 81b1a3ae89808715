use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::stains::{ColorDeconvolutionStains, StainsHandle};

use super::{ImageServer, MemoryPropertyStore, PropertyStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    #[default]
    Unset,
    Fluorescence,
    #[serde(rename = "brightfield_h_e")]
    BrightfieldHE,
    #[serde(rename = "brightfield_h_dab")]
    BrightfieldHDab,
    BrightfieldOther,
    Other,
}

impl ImageType {
    pub fn is_brightfield(self) -> bool {
        matches!(
            self,
            Self::BrightfieldHE | Self::BrightfieldHDab | Self::BrightfieldOther
        )
    }

    pub fn has_recognized_stain_preset(self) -> bool {
        matches!(self, Self::BrightfieldHE | Self::BrightfieldHDab)
    }

    pub fn default_stains(self) -> Option<ColorDeconvolutionStains> {
        match self {
            Self::BrightfieldHE => Some(ColorDeconvolutionStains::hematoxylin_eosin()),
            Self::BrightfieldHDab => Some(ColorDeconvolutionStains::hematoxylin_dab()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageData {
    server: Arc<dyn ImageServer>,
    image_type: ImageType,
    stains: StainsHandle,
    properties: Arc<dyn PropertyStore>,
}

impl ImageData {
    /// Brightfield images with a recognized preset start with that preset's stains.
    pub fn new(server: Arc<dyn ImageServer>, image_type: ImageType) -> Self {
        Self {
            server,
            image_type,
            stains: StainsHandle::new(image_type.default_stains()),
            properties: Arc::new(MemoryPropertyStore::new()),
        }
    }

    pub fn with_properties(mut self, properties: Arc<dyn PropertyStore>) -> Self {
        self.properties = properties;
        self
    }

    pub fn server(&self) -> &Arc<dyn ImageServer> {
        &self.server
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn is_brightfield(&self) -> bool {
        self.image_type.is_brightfield()
    }

    /// Changing the type resets the stains to the new type's preset.
    pub fn set_image_type(&mut self, image_type: ImageType) {
        if self.image_type != image_type {
            self.image_type = image_type;
            self.stains.set(image_type.default_stains());
        }
    }

    pub fn stains(&self) -> &StainsHandle {
        &self.stains
    }

    pub fn properties(&self) -> &Arc<dyn PropertyStore> {
        &self.properties
    }
}
