use crate::model::{blue, green, pack_rgb, red};

/// 256-entry intensity to colour table running from black to a solid colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLut {
    color: u32,
    table: [u32; 256],
}

impl ColorLut {
    pub fn solid(color: u32) -> Self {
        let color = color & 0x00ff_ffff;
        let scale = |component: u8, intensity: usize| {
            ((usize::from(component) * intensity) / 255) as u8
        };
        let table = std::array::from_fn(|intensity| {
            pack_rgb(
                scale(red(color), intensity),
                scale(green(color), intensity),
                scale(blue(color), intensity),
            )
        });
        Self { color, table }
    }

    pub fn gray() -> Self {
        Self::solid(0x00ff_ffff)
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn get(&self, intensity: u8) -> u32 {
        self.table[usize::from(intensity)]
    }
}
