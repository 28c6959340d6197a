//! Glyph sampling: rasterize text, keep every Nth covered pixel, shuffle.
//!
//! Rasterization is a platform capability. [`GlyphRaster`] is the seam: the
//! browser build renders with an off-screen 2D canvas, tests use plain bitmaps.

use glam::UVec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Config;

/// Alpha coverage of a rendered string, one byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Coverage {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl Coverage {
    /// Returns an empty coverage if `alpha` does not match the dimensions.
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Self {
        if alpha.len() != (width as usize) * (height as usize) {
            log::warn!(
                "coverage size mismatch: {}x{} with {} bytes",
                width,
                height,
                alpha.len()
            );
            return Self::default();
        }
        Self {
            width,
            height,
            alpha,
        }
    }

    /// Keep only the alpha channel of an RGBA8 buffer (as returned by `getImageData`).
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::new(width, height, alpha)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }
}

/// Renders `text` in a bold face of `font_px`, centered on a `width` x `height`
/// transparent surface.
pub trait GlyphRaster {
    fn rasterize(&mut self, text: &str, font_px: f32, width: u32, height: u32) -> Coverage;
}

/// Font size that keeps `char_count` bold glyphs inside 90% of `width`.
pub fn font_size_for(width: f32, char_count: usize, config: &Config) -> f32 {
    // Average bold advance is roughly 0.6em.
    let fit = width * 0.9 / (0.6 * char_count.max(1) as f32);
    fit.min(config.max_font_px).max(config.min_font_px)
}

/// Covered pixels at every `stride`th linear pixel index, in a fresh random order.
pub fn sample<R: Rng + ?Sized>(coverage: &Coverage, stride: usize, rng: &mut R) -> Vec<UVec2> {
    let stride = stride.max(1);
    let mut coords: Vec<UVec2> = coverage
        .alpha
        .iter()
        .enumerate()
        .step_by(stride)
        .filter(|(_, a)| **a > 0)
        .map(|(i, _)| {
            let i = i as u32;
            UVec2::new(i % coverage.width, i / coverage.width)
        })
        .collect();
    coords.shuffle(rng);
    coords
}

/// Rasterize `config.text` for a `width` x `height` surface and sample it.
/// A zero-area surface yields no coordinates and never touches the raster.
pub fn sample_text<G, R>(raster: &mut G, width: u32, height: u32, config: &Config, rng: &mut R) -> Vec<UVec2>
where
    G: GlyphRaster + ?Sized,
    R: Rng + ?Sized,
{
    if width == 0 || height == 0 || config.text.is_empty() {
        return Vec::new();
    }
    let font_px = font_size_for(width as f32, config.text.chars().count(), config);
    let coverage = raster.rasterize(&config.text, font_px, width, height);
    let coords = sample(&coverage, config.pixel_stride, rng);
    log::debug!(
        "sampled {} targets from {}x{} at {:.0}px",
        coords.len(),
        width,
        height,
        font_px
    );
    coords
}
