use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::sampler::{Coverage, GlyphRaster};

/// Renders text on a detached canvas and reads the alpha channel back.
pub struct CanvasRaster {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRaster {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context not supported")?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    fn render(&mut self, text: &str, font_px: f32, width: u32, height: u32) -> Result<Coverage, JsValue> {
        // Setting the size also clears the bitmap.
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        self.ctx.set_fill_style_str("white");
        self.ctx.set_font(&format!("bold {}px Arial", font_px.round()));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx
            .fill_text(text, f64::from(width) / 2.0, f64::from(height) / 2.0)?;

        let image = self
            .ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;
        Ok(Coverage::from_rgba(width, height, &image.data()))
    }
}

impl GlyphRaster for CanvasRaster {
    fn rasterize(&mut self, text: &str, font_px: f32, width: u32, height: u32) -> Coverage {
        match self.render(text, font_px, width, height) {
            Ok(coverage) => coverage,
            Err(err) => {
                log::warn!("glyph rasterization failed: {:?}", err);
                Coverage::default()
            }
        }
    }
}
