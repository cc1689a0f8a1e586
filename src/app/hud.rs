//! Diagnostics overlay (F3): frame rate, particle count, mount mode

use eframe::egui;
use std::collections::VecDeque;

use super::PortfolioApp;
use crate::core::FrameTick;
use crate::theme::colors;

/// Frames averaged over
const WINDOW: usize = 60;

/// Rolling frame rate over the last [`WINDOW`] ticks
pub struct FpsCounter {
    frames: VecDeque<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(WINDOW + 1),
        }
    }

    pub fn tick(&mut self, tick: &FrameTick) {
        self.frames.push_back(tick.now);
        if self.frames.len() > WINDOW {
            self.frames.pop_front();
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.front(), self.frames.back()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioApp {
    pub(crate) fn render_hud(&self, ctx: &egui::Context) {
        let mode = if self.field.is_animated() { "animated" } else { "static" };
        let fps = self.fps_counter.fps();
        let fps_color = if fps >= 55.0 {
            colors::TEXT_PRIMARY
        } else {
            colors::TEXT_MUTED
        };

        egui::Area::new(egui::Id::new("field_hud"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(colors::BG_GLASS)
                    .stroke(egui::Stroke::new(1.0, colors::BORDER))
                    .corner_radius(6.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(format!("{fps:.0} fps")).monospace().color(fps_color));
                        ui.label(
                            egui::RichText::new(format!("{} particles", self.field.particle_count()))
                                .monospace()
                                .color(colors::TEXT_SECONDARY),
                        );
                        ui.label(egui::RichText::new(mode).monospace().color(colors::TEXT_MUTED));
                        if let Some(player) = &self.player {
                            let state = if player.is_playing() { "playing" } else { "paused" };
                            ui.label(
                                egui::RichText::new(format!("{state}: {}", player.current_song().name))
                                    .monospace()
                                    .color(colors::TEXT_MUTED),
                            );
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(now: f64) -> FrameTick {
        FrameTick { frame: 0, now, delta: 0.0 }
    }

    #[test]
    fn test_fps_needs_two_frames() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.fps(), 0.0);
        counter.tick(&tick(1.0));
        assert_eq!(counter.fps(), 0.0);
    }

    #[test]
    fn test_fps_over_steady_frames() {
        let mut counter = FpsCounter::new();
        for i in 0..=30 {
            counter.tick(&tick(i as f64 / 30.0));
        }
        assert!((counter.fps() - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut counter = FpsCounter::new();
        for i in 0..200 {
            counter.tick(&tick(i as f64 * 0.5));
        }
        assert_eq!(counter.frames.len(), WINDOW);
        assert!((counter.fps() - 2.0).abs() < 1e-6);
    }
}
