use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradient_engine::animation::{TimingCurve, TimingPreset};
use gradient_engine::gradient::reference_colors;
use gradient_engine::paint::GradientColor;

/// User choices persisted between runs.
///
/// Unknown or missing fields fall back to their defaults, so older files keep
/// loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Straight RGB in `[0, 1]`, one per control point.
    pub colors: Vec<[f32; 3]>,
    /// `[x1, y1, x2, y2]`.
    pub timing_curve: [f32; 4],
    /// Picker label; `"Custom"` means `timing_curve` was edited by hand.
    pub timing_curve_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        let preset = TimingPreset::default();
        Self {
            colors: reference_colors().iter().map(|c| [c.r, c.g, c.b]).collect(),
            timing_curve: preset.curve().to_array(),
            timing_curve_name: preset.name().to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Opaque colors, clamped to `[0, 1]`.
    pub fn gradient_colors(&self) -> Vec<GradientColor> {
        self.colors
            .iter()
            .map(|&[r, g, b]| GradientColor::rgb(r, g, b).clamped())
            .collect()
    }

    /// Resolves the stored curve. A name that is not a known preset keeps
    /// the stored control points as a custom curve.
    pub fn timing_preset(&self) -> TimingPreset {
        let curve = TimingCurve::from_array(self.timing_curve);
        TimingPreset::from_name(&self.timing_curve_name, curve)
            .unwrap_or(TimingPreset::Custom(curve))
    }
}

/// Settings plus where they live and whether they changed since the last
/// save.
///
/// Nothing is written until [`save`](Self::save) is called.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
    dirty: bool,
}

impl SettingsStore {
    /// Reads `path`. A missing file yields defaults silently; an unreadable
    /// or malformed one yields defaults with a warning.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match read_settings(&path) {
            Ok(Some(settings)) => {
                log::info!("settings loaded from {}", path.display());
                settings
            }
            Ok(None) => {
                log::debug!("no settings at {}; using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                log::warn!("ignoring settings file: {e:#}");
                Settings::default()
            }
        };
        Self {
            path: Some(path),
            settings,
            dirty: false,
        }
    }

    /// A store that never touches the filesystem.
    #[cfg(test)]
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            settings,
            dirty: false,
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_colors(&mut self, colors: &[GradientColor]) {
        let colors: Vec<[f32; 3]> = colors.iter().map(|c| [c.r, c.g, c.b]).collect();
        if colors != self.settings.colors {
            self.settings.colors = colors;
            self.dirty = true;
        }
    }

    pub fn set_timing(&mut self, preset: TimingPreset) {
        let curve = preset.curve().to_array();
        let name = preset.name();
        if curve != self.settings.timing_curve || name != self.settings.timing_curve_name {
            self.settings.timing_curve = curve;
            self.settings.timing_curve_name = name.to_string();
            self.dirty = true;
        }
    }

    /// Writes pending changes. Returns whether anything was written.
    ///
    /// The file is replaced atomically through a sibling temp file.
    pub fn save(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let Some(path) = self.path.as_deref() else {
            self.dirty = false;
            return Ok(false);
        };

        let json = self.settings.to_json().context("failed to serialize settings")?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        self.dirty = false;
        log::info!("settings saved to {}", path.display());
        Ok(true)
    }
}

fn read_settings(path: &Path) -> Result<Option<Settings>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    let settings =
        Settings::from_json(&json).with_context(|| format!("malformed {}", path.display()))?;
    Ok(Some(settings))
}
