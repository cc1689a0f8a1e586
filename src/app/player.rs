//! Floating play button with the frequency bars behind it

use eframe::egui;

use super::PortfolioApp;
use crate::theme::colors;

/// Diameter of the play button
const BUTTON_SIZE: f32 = 56.0;
/// Distance from the bottom-right window corner
const CORNER_OFFSET: f32 = 32.0;

impl PortfolioApp {
    pub(crate) fn render_player(&mut self, ctx: &egui::Context) {
        let Some(player) = &mut self.player else {
            return;
        };

        let mut toggle = false;
        let mut skip = false;

        egui::Area::new(egui::Id::new("music_player"))
            .anchor(
                egui::Align2::RIGHT_BOTTOM,
                egui::vec2(-CORNER_OFFSET, -CORNER_OFFSET),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if player.is_playing() && player.song_count() > 1 {
                        let next = ui
                            .add(egui::Button::new(egui::RichText::new("⏭").color(colors::TEXT_SECONDARY)).frame(false))
                            .on_hover_text("Next song");
                        skip = next.clicked();
                    }

                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(BUTTON_SIZE, BUTTON_SIZE), egui::Sense::click());
                    let painter = ui.painter_at(rect);
                    let scale = if response.hovered() { 1.05 } else { 1.0 };
                    let radius = BUTTON_SIZE * 0.5 * scale;

                    painter.circle(
                        rect.center(),
                        radius,
                        colors::BG_GLASS,
                        egui::Stroke::new(1.0, colors::BORDER),
                    );

                    if player.is_visualizing() {
                        let visualizer = player.visualizer();
                        for bar in visualizer.bars(rect.width(), rect.height()) {
                            if bar.height <= 0.0 {
                                continue;
                            }
                            let bar_rect = egui::Rect::from_min_size(
                                rect.min + egui::vec2(bar.x, bar.y),
                                egui::vec2(bar.width, bar.height),
                            );
                            painter.rect_filled(bar_rect, 0.0, colors::PRIMARY.gamma_multiply(bar.alpha * 0.4));
                        }
                    }

                    let glyph = if player.is_playing() { "⏸" } else { "▶" };
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        glyph,
                        egui::FontId::proportional(20.0 * scale),
                        colors::TEXT_PRIMARY,
                    );

                    let hint = if player.is_playing() { "Pause music" } else { "Play music" };
                    toggle = response.on_hover_text(hint).clicked();
                });
            });

        if toggle {
            player.toggle();
        }
        if skip {
            player.next_song();
        }
    }
}
