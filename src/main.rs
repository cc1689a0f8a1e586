//! Native window for the portfolio background
//!
//! Run with: cargo run --features native -- [--static] [--seed N]

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use clap::Parser;
    use eframe::egui;
    use portfolio_field::app::{wgpu_options, PortfolioApp, APP_TITLE};
    use portfolio_field::field::SurfacePreferences;
    use portfolio_field::settings::{Overrides, Settings};
    use std::path::PathBuf;
    use tracing::{info, warn};
    use tracing_subscriber::{fmt, EnvFilter};

    #[derive(Parser, Debug)]
    #[command(name = "portfolio-field", about = "Animated particle background with a music player")]
    struct Args {
        /// Settings JSON file (falls back to $PORTFOLIO_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Always show the static gradient
        #[arg(long = "static")]
        force_static: bool,

        /// Seed for particle sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Override the particle count
        #[arg(long)]
        particles: Option<usize>,
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portfolio_field=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let mut settings = Settings::load_or_default(args.config.as_deref());
    let overrides = Overrides {
        force_static: args.force_static,
        seed: args.seed,
        particles: args.particles,
    };
    if let Err(e) = settings.apply(&overrides) {
        warn!(error = %e, "Ignoring command-line overrides");
    }
    info!(
        particles = settings.field.count,
        seed = ?settings.field.seed,
        force_static = settings.force_static,
        "Starting"
    );

    let prefs = SurfacePreferences::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1280.0, 800.0])
            .with_transparent(prefs.transparent),
        multisampling: if prefs.antialias { 4 } else { 0 },
        wgpu_options: wgpu_options(&prefs),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(PortfolioApp::new(cc, settings)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
