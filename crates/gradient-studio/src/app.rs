use std::time::{Duration, Instant};

use anyhow::Result;

use gradient_engine::animation::TimingPreset;
use gradient_engine::core::{App, AppControl, FrameCtx};
use gradient_engine::gradient::{Gradient, GradientConfig};
use gradient_engine::input::{InputFrame, Key};
use gradient_engine::paint::GradientColor;
use gradient_engine::render::{GradientRenderer, RenderDriver};

use crate::settings::SettingsStore;

/// Alternate palettes offered after the user's own colors.
const PALETTES: [[&str; 4]; 3] = [
    ["#F4B6C2", "#6A4C93", "#FFD6A5", "#1982C4"],
    ["#CAF0F8", "#0077B6", "#90E0EF", "#023E8A"],
    ["#FFE8D6", "#CB997E", "#DDBEA9", "#6B705C"],
];

/// What the user asked for this frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    AnimatePositions,
    NextPalette,
    NextTiming,
    Save,
    Exit,
}

impl Action {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Space | Key::Enter => Some(Action::AnimatePositions),
            Key::C => Some(Action::NextPalette),
            Key::T => Some(Action::NextTiming),
            Key::S => Some(Action::Save),
            Key::Escape => Some(Action::Exit),
            _ => None,
        }
    }
}

/// Host state: one gradient, its renderer and driver, and the settings it
/// was started from.
pub struct StudioApp {
    title: String,
    gradient: Gradient,
    driver: RenderDriver,
    renderer: GradientRenderer,

    store: SettingsStore,
    timing: TimingPreset,
    duration: Duration,

    palettes: Vec<Vec<GradientColor>>,
    palette: usize,
    title_stale: bool,
}

impl StudioApp {
    pub fn new(title: impl Into<String>, config: GradientConfig, store: SettingsStore) -> Result<Self> {
        let gradient = Gradient::new(&config)?;

        let mut palettes = vec![config.colors.clone()];
        palettes.extend(PALETTES.iter().filter_map(|hex| {
            let colors: Option<Vec<_>> = hex.iter().map(|h| GradientColor::from_hex(h)).collect();
            colors.filter(|c| c.len() == config.colors.len())
        }));

        Ok(Self {
            title: title.into(),
            driver: RenderDriver::new(config.frames_in_flight),
            renderer: GradientRenderer::from_config(&config),
            gradient,
            store,
            timing: config.timing,
            duration: config.transition_duration,
            palettes,
            palette: 0,
            title_stale: true,
        })
    }

    /// Applies `action` at `now`. Returns `Exit` only for [`Action::Exit`].
    pub fn apply(&mut self, action: Action, now: Instant) -> AppControl {
        match action {
            Action::AnimatePositions => {
                self.gradient
                    .animate_positions(now, self.duration, self.timing.curve());
            }
            Action::NextPalette => self.next_palette(now),
            Action::NextTiming => {
                self.timing = self.timing.next();
                self.store.set_timing(self.timing);
                self.title_stale = true;
                log::info!("timing curve: {}", self.timing.name());
            }
            Action::Save => self.save_settings(),
            Action::Exit => return AppControl::Exit,
        }
        AppControl::Continue
    }

    fn next_palette(&mut self, now: Instant) {
        let next = (self.palette + 1) % self.palettes.len();
        let target = self.palettes[next].clone();
        match self
            .gradient
            .animate_colors(target.clone(), now, self.duration, self.timing.curve())
        {
            Ok(true) => {
                self.palette = next;
                self.store.set_colors(&target);
            }
            Ok(false) => {}
            Err(e) => log::warn!("palette rejected: {e}"),
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.store.save() {
            log::error!("failed to save settings: {e:#}");
        }
    }

    fn handle_input(&mut self, input: &InputFrame, now: Instant) -> AppControl {
        if input.focus_changed == Some(false) {
            self.save_settings();
        }
        let mut actions: Vec<Action> = input
            .keys_pressed
            .iter()
            .filter_map(|k| Action::from_key(*k))
            .collect();
        // `keys_pressed` is unordered; exit last so other keys still apply
        actions.sort_by_key(|a| *a == Action::Exit);

        for action in actions {
            if self.apply(action, now) == AppControl::Exit {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_input(ctx.input_frame, ctx.now) == AppControl::Exit {
            return AppControl::Exit;
        }

        if self.title_stale {
            ctx.window
                .set_title(&format!("{} - {}", self.title, self.timing.name()));
            self.title_stale = false;
        }

        ctx.render_gradient(&mut self.driver, &mut self.renderer, &mut self.gradient)
    }

    fn on_exit(&mut self) {
        self.save_settings();
    }
}
