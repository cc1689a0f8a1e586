//! Portfolio background - animated particle field with a music player
//!
//! Renders a slowly drifting field of translucent spheres behind the page
//! and falls back to a static gradient when accelerated rendering is
//! unavailable. A small floating player loops song segments and draws
//! their frequency spectrum behind its play button.
//!
//! - `core`: particle pool, instance buffer, frame clock and animator mount
//! - `field`: camera, sphere mesh and the wgpu renderer
//! - `audio`: playlist, audio sinks and the visualizer

pub mod audio;
pub mod core;
pub mod field;
pub mod settings;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod theme;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web {
    use tracing::error;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::{wgpu_options, PortfolioApp};
    use crate::field::SurfacePreferences;
    use crate::settings::Settings;

    /// Id of the canvas element the page provides
    const CANVAS_ID: &str = "canvas";

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let settings = Settings::from_window();
        let web_options = eframe::WebOptions {
            wgpu_options: wgpu_options(&SurfacePreferences::default()),
            ..Default::default()
        };

        wasm_bindgen_futures::spawn_local(async move {
            let Some(canvas) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(CANVAS_ID))
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            else {
                error!(id = CANVAS_ID, "Canvas element not found");
                return;
            };

            if let Err(e) = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(PortfolioApp::new(cc, settings)))),
                )
                .await
            {
                error!(error = ?e, "Failed to start eframe");
            }
        });
    }
}
