#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Particle text reveal: a rasterized string becomes a swarm of steered agents
//! that fly in, light up and settle, with optional pointer interaction.
//!
//! The simulation core is platform independent. Browser glue lives in the
//! `wasm` module and is only compiled for `wasm32`.

pub mod blend;
pub mod color;
pub mod completion;
pub mod config;
pub mod interaction;
pub mod particle;
pub mod pool;
pub mod sampler;
pub mod session;
pub mod steering;

pub use config::Config;
pub use session::{FrameReport, Painter, Session};

// Only compile wasm-specific code when targeting wasm32; everything above
// also builds and tests on the host.

#[cfg(target_arch = "wasm32")]
pub use wasm::{CanvasRaster, ParticleName};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod raster;
    mod render;

    pub use raster::CanvasRaster;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        // Pages that mount through `ParticleName` leave out `#c`.
        let Some(element) = document.get_element_by_id("c") else {
            return Ok(());
        };
        let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;
        let config = render::config_from_dataset(&canvas, None)?;

        let on_complete = {
            let document = document.clone();
            let canvas = canvas.clone();
            Closure::once_into_js(move || {
                if let Some(body) = document.body() {
                    body.class_list().add_1("revealed").ok();
                }
                if let Ok(event) = web_sys::Event::new("reveal-complete") {
                    canvas.dispatch_event(&event).ok();
                }
            })
        };

        let mount = render::Mount::start(canvas, config, on_complete.unchecked_into())?;
        // Auto-mounted canvases live for the page lifetime.
        std::mem::forget(mount);
        Ok(())
    }

    /// Handle for hosts that manage the canvas lifetime themselves.
    #[wasm_bindgen]
    pub struct ParticleName {
        mount: Option<render::Mount>,
    }

    #[wasm_bindgen]
    impl ParticleName {
        /// Start the reveal on `canvas`. `on_complete` is called at most once.
        /// Leaving `interactive` undefined defers to `data-interactive`.
        #[wasm_bindgen(constructor)]
        pub fn new(
            canvas: web_sys::HtmlCanvasElement,
            on_complete: js_sys::Function,
            interactive: Option<bool>,
        ) -> Result<ParticleName, JsValue> {
            let config = render::config_from_dataset(&canvas, interactive)?;
            let mount = render::Mount::start(canvas, config, on_complete)?;
            Ok(ParticleName { mount: Some(mount) })
        }

        /// Stop the loop and detach every listener. Safe to call twice.
        pub fn unmount(&mut self) {
            if let Some(mount) = self.mount.take() {
                mount.stop();
            }
        }

        #[wasm_bindgen(getter)]
        pub fn mounted(&self) -> bool {
            self.mount.is_some()
        }
    }
}
