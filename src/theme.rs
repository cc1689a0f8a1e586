//! Deep-indigo theme matching the portfolio page

use egui::Color32;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(3, 0, 20);          // #030014 - page background
    pub const BG_GLASS: Color32 = Color32::from_rgba_premultiplied(8, 8, 14, 40); // white/5 over the page

    // === Accent ===
    pub const PRIMARY: Color32 = Color32::from_rgb(99, 102, 241);         // #6366f1 - indigo-500

    // === Text (slate) ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(203, 213, 225);   // #CBD5E1 - slate-300
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(148, 163, 184); // #94A3B8 - slate-400
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);     // #64748B - slate-500

    // === Lines & Borders ===
    pub const BORDER: Color32 = Color32::from_rgba_premultiplied(25, 25, 25, 25); // white/10
}

/// Dark visuals on the page background, indigo selection
pub fn portfolio_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PRIMARY;
    visuals.extreme_bg_color = BG_PRIMARY;

    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.inactive.weak_bg_fill = BG_GLASS;
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);

    visuals.widgets.hovered.weak_bg_fill = BG_GLASS;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, PRIMARY.gamma_multiply(0.4));
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, PRIMARY);

    visuals.selection.bg_fill = PRIMARY.gamma_multiply(0.3);
    visuals.selection.stroke = egui::Stroke::new(1.0, PRIMARY);

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
