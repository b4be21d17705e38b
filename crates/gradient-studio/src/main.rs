mod app;
mod settings;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::TypedValueParser;
use winit::dpi::LogicalSize;

use gradient_engine::animation::DEFAULT_FRAMES_IN_FLIGHT;
use gradient_engine::device::GpuInit;
use gradient_engine::gradient::GradientConfig;
use gradient_engine::logging::{init_logging, LoggingConfig};
use gradient_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;
use crate::settings::{Settings, SettingsStore};

const TITLE: &str = "Gradient Studio";

/// Animated multi-color gradient background.
///
/// Space: move control points. C: next palette. T: next timing curve.
/// S: save settings. Esc: quit.
#[derive(Debug, Parser)]
#[command(name = "gradient-studio", version, about)]
struct Cli {
    /// Settings file (JSON). Created on first save.
    #[arg(long, default_value = "gradient-settings.json")]
    settings: PathBuf,

    /// Transition duration in seconds.
    #[arg(long, default_value_t = 0.45)]
    duration: f64,

    /// Frames allowed in flight on the GPU.
    #[arg(long, default_value_t = DEFAULT_FRAMES_IN_FLIGHT,
          value_parser = clap::value_parser!(u8).range(1..=8).map(usize::from))]
    frames_in_flight: usize,

    /// Gaussian blur sigma in pixels; 0 disables the blur.
    #[arg(long, default_value_t = 35.0)]
    blur_sigma: f32,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn build_config(cli: &Cli, settings: &Settings) -> Result<GradientConfig> {
    let transition_duration = Duration::try_from_secs_f64(cli.duration)
        .with_context(|| format!("invalid --duration {}", cli.duration))?;
    anyhow::ensure!(
        cli.blur_sigma.is_finite() && cli.blur_sigma >= 0.0,
        "--blur-sigma must be a non-negative number"
    );

    let mut config = GradientConfig {
        timing: settings.timing_preset(),
        transition_duration,
        frames_in_flight: cli.frames_in_flight,
        blur_sigma: cli.blur_sigma,
        ..GradientConfig::default()
    };

    let colors = settings.gradient_colors();
    if colors.len() == config.primary_points.len() {
        config.colors = colors;
    } else {
        log::warn!(
            "settings hold {} colors but the gradient has {} points; using default colors",
            colors.len(),
            config.primary_points.len()
        );
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let store = SettingsStore::load(&cli.settings);
    let config = build_config(&cli, store.settings())?;
    log::debug!("starting with {config:?}");

    let gpu_init = GpuInit::default().with_frames_in_flight(config.frames_in_flight);
    let app = StudioApp::new(TITLE, config, store)?;

    Runtime::run(
        RuntimeConfig {
            title: TITLE.to_string(),
            initial_size: LogicalSize::new(390.0, 844.0),
        },
        gpu_init,
        app,
    )
}
