use num_traits::clamp;

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 128.0 / 255.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const ORANGE: Color = Color::new(1.0, 165.0 / 255.0, 0.0, 1.0);
    pub const AQUA: Color = Color::new(0.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self { red, green, blue, alpha }
    }

    #[inline]
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Converts a `[0, 1]` component into the `0..=255` range used by
    /// normalized byte buffers.
    #[inline]
    pub fn float_to_byte(value: f32) -> u8 {
        let value = clamp(value, 0.0, 1.0);
        if value == 1.0 {
            255
        } else {
            (value * 256.0) as u8
        }
    }

    #[inline]
    pub fn byte_to_float(value: u8) -> f32 {
        value as f32 / 255.0
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [
            Self::float_to_byte(self.red),
            Self::float_to_byte(self.green),
            Self::float_to_byte(self.blue),
            Self::float_to_byte(self.alpha),
        ]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(
            Self::byte_to_float(bytes[0]),
            Self::byte_to_float(bytes[1]),
            Self::byte_to_float(bytes[2]),
            Self::byte_to_float(bytes[3]),
        )
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Color::new(c[0], c[1], c[2], c[3])
    }
}
