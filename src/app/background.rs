//! Full-window background: the particle field or its static gradient

use eframe::egui;

use super::PortfolioApp;
use crate::field::{paint_bottom_fade, paint_grid, paint_static_panel, FieldCallback, FieldUniforms, PARTICLE_TINT};
use crate::theme::colors;

impl PortfolioApp {
    pub(crate) fn render_background(&self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;

        // Grid sits on the page fill, under both the field and the static panel
        paint_grid(&painter, rect);

        match self.field.instances() {
            Some(instances) => {
                let aspect_ratio = rect.width() / rect.height();
                let uniforms = FieldUniforms {
                    view_proj: self.camera.view_proj(aspect_ratio).to_cols_array_2d(),
                    tint: PARTICLE_TINT,
                };
                painter.add(egui_wgpu::Callback::new_paint_callback(
                    rect,
                    FieldCallback {
                        instances: instances.clone(),
                        uniforms,
                    },
                ));
            }
            None => {
                let gradient = self.field.gradient().unwrap_or_default();
                paint_static_panel(&painter, rect, &gradient);
            }
        }

        // Blend the lower third into the page
        let fade = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - rect.height() / 3.0),
            rect.right_bottom(),
        );
        paint_bottom_fade(&painter, fade, colors::BG_PRIMARY);
    }
}
