//! RGB triples and linear interpolation between them.

/// Color with 0-255 channels stored as floats so that a mid-blend color can be
/// captured as a new start color without rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
    /// Cool end of the glitter palette.
    pub const GLITTER_BLUE: Rgb = Rgb::new(120.0, 190.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `self + (other - self) * t`, channel-wise. `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Channels rounded to the nearest integer and clamped to 0..=255.
    pub fn to_u8(self) -> [u8; 3] {
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// `rgb(r, g, b)` for a canvas fill style.
    pub fn css(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("rgb({}, {}, {})", r, g, b)
    }
}

fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
