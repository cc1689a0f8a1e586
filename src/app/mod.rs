//! Portfolio background app
//!
//! This module contains the egui app that runs on both native and WASM platforms.
//! eframe's `update` is the frame clock: every repaint ticks the animator
//! and the music visualizer once.

mod background;
mod hud;
mod player;

use eframe::egui;
use std::rc::Rc;
use tracing::info;

use crate::audio::{AudioSink, MusicPlayer, SilentSink};
use crate::core::{host_seconds, Capability, FieldAnimator, FieldMount, FrameClock};
use crate::field::{FieldCamera, FieldRenderer, SurfacePreferences};
use crate::settings::Settings;
use crate::theme::{colors, portfolio_visuals};

/// Window / document title
pub const APP_TITLE: &str = "Students of ESISA";

pub struct PortfolioApp {
    /// Ticked once per `update`
    clock: FrameClock,
    /// Animated particle field or static gradient, fixed at mount
    pub(crate) field: FieldMount,
    pub(crate) camera: FieldCamera,
    pub(crate) player: Option<MusicPlayer>,
    pub(crate) fps_counter: hud::FpsCounter,
    /// Toggle with F3
    pub(crate) show_hud: bool,
}

/// wgpu configuration honoring the surface preferences
pub fn wgpu_options(prefs: &SurfacePreferences) -> egui_wgpu::WgpuConfiguration {
    let mut config = egui_wgpu::WgpuConfiguration::default();
    if let egui_wgpu::WgpuSetup::CreateNew(create_new) = &mut config.wgpu_setup {
        create_new.power_preference = if prefs.high_performance {
            egui_wgpu::wgpu::PowerPreference::HighPerformance
        } else {
            egui_wgpu::wgpu::PowerPreference::LowPower
        };
    }
    config
}

impl PortfolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        cc.egui_ctx.set_visuals(portfolio_visuals());

        let render_state = cc.wgpu_render_state.as_ref();
        let capability = if settings.force_static {
            Capability::Unsupported
        } else {
            probe_surface(render_state.is_some())
        };

        let clock = FrameClock::new();
        let field = FieldAnimator::mount(capability.is_available(), &settings.field, &clock);

        // Register the GPU renderer only for the animated mount
        if field.is_animated() {
            if let Some(render_state) = render_state {
                let renderer = FieldRenderer::new(
                    &render_state.device,
                    render_state.target_format,
                    field.particle_count(),
                );
                render_state
                    .renderer
                    .write()
                    .callback_resources
                    .insert(renderer);
            }
        }

        let player = MusicPlayer::with_random_song(
            create_sink(),
            settings.playlist,
            clock.clone(),
            &mut rand::thread_rng(),
        );

        info!(
            capability = ?capability,
            particles = field.particle_count(),
            player = player.is_some(),
            "Portfolio app created"
        );

        Self {
            clock,
            field,
            camera: FieldCamera::default(),
            player,
            fps_counter: hud::FpsCounter::new(),
            show_hud: false,
        }
    }
}

/// Probe the host surface. On the web this also checks that a WebGL
/// context can be created at all.
#[cfg(target_arch = "wasm32")]
fn probe_surface(has_wgpu: bool) -> Capability {
    if !has_wgpu {
        return Capability::Unsupported;
    }
    crate::core::capability::probe_webgl()
}

#[cfg(not(target_arch = "wasm32"))]
fn probe_surface(has_wgpu: bool) -> Capability {
    Capability::probe(|| Ok::<_, std::convert::Infallible>(has_wgpu))
}

#[cfg(target_arch = "wasm32")]
fn create_sink() -> Rc<dyn AudioSink> {
    match crate::audio::WebAudioSink::new() {
        Ok(sink) => Rc::new(sink),
        Err(e) => {
            tracing::warn!(error = %e, "Web audio unavailable, player is silent");
            Rc::new(SilentSink::default())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_sink() -> Rc<dyn AudioSink> {
    Rc::new(SilentSink::default())
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Continuous repaint drives the frame clock
        ctx.request_repaint();

        let tick = self.clock.tick_at(host_seconds());
        self.fps_counter.tick(&tick);

        if let Some(player) = &mut self.player {
            player.poll();
        }

        if ctx.input(|i| i.key_pressed(egui::Key::F3)) {
            self.show_hud = !self.show_hud;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_background(ui);
            });

        self.render_player(ctx);

        if self.show_hud {
            self.render_hud(ctx);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        if SurfacePreferences::default().transparent {
            [0.0, 0.0, 0.0, 0.0]
        } else {
            colors::BG_PRIMARY.to_normalized_gamma_f32()
        }
    }
}
