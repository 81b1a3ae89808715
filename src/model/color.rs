pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

pub fn unpack_rgb(rgb: u32) -> (u8, u8, u8) {
    (red(rgb), green(rgb), blue(rgb))
}

pub fn red(rgb: u32) -> u8 {
    ((rgb >> 16) & 0xff) as u8
}

pub fn green(rgb: u32) -> u8 {
    ((rgb >> 8) & 0xff) as u8
}

pub fn blue(rgb: u32) -> u8 {
    (rgb & 0xff) as u8
}

pub fn clamp8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
