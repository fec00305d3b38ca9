//! Page options and their validated form.
//!
//! [`BackgroundOptions`] mirrors the loosely typed options object a page
//! passes in: every key optional, camelCase. [`BackgroundConfig`] is what the
//! controller consumes; converting between them is the single place colors are
//! canonicalized and ranges are checked.

use crate::color::{ColorSpec, Palette};
use crate::error::ConfigError;
use serde::Deserialize;

/// Which entity strategy fills the scene. The two never run together.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Trails,
    Branches,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundOptions {
    pub colors: Option<Vec<ColorSpec>>,
    pub mode: Option<Mode>,
    pub line_count: Option<usize>,
    pub initial_lines: Option<usize>,
    pub segments: Option<usize>,
    pub bounds: Option<f32>,
    pub branch_count: Option<usize>,
    pub max_branches: Option<usize>,
    pub spawn_interval_ms: Option<f64>,
    pub fov: Option<f32>,
    pub camera_z: Option<f32>,
    pub rotation_idle_ms: Option<f64>,
    pub warmup_ms: Option<f64>,
    pub dust_count: Option<usize>,
    pub fog_density: Option<f32>,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundConfig {
    pub palette: Palette,
    pub mode: Mode,
    /// Trail cap; the timer tops up to this many lines.
    pub line_count: usize,
    /// Trails created at start (never more than `line_count`).
    pub initial_lines: usize,
    pub segments: usize,
    pub bounds: f32,
    /// Branches created at start (never more than `max_branches`).
    pub branch_count: usize,
    pub max_branches: usize,
    pub spawn_interval_ms: f64,
    pub fov_degrees: f32,
    pub camera_z: f32,
    pub rotation_idle_ms: f64,
    pub warmup_ms: f64,
    pub dust_count: usize,
    pub fog_density: f32,
    pub seed: Option<u64>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            mode: Mode::Trails,
            line_count: 45,
            initial_lines: 45,
            segments: 80,
            bounds: 7.0,
            branch_count: 6,
            max_branches: 48,
            spawn_interval_ms: 1500.0,
            fov_degrees: 60.0,
            camera_z: 18.0,
            rotation_idle_ms: 3000.0,
            warmup_ms: 1000.0,
            dust_count: 300,
            fog_density: 0.06,
            seed: None,
        }
    }
}

impl TryFrom<BackgroundOptions> for BackgroundConfig {
    type Error = ConfigError;

    fn try_from(opts: BackgroundOptions) -> Result<Self, Self::Error> {
        let d = BackgroundConfig::default();
        let palette = match &opts.colors {
            Some(specs) => Palette::from_specs(specs)?,
            None => d.palette,
        };

        let line_count = opts.line_count.unwrap_or(d.line_count);
        let max_branches = opts.max_branches.unwrap_or(d.max_branches);
        let config = BackgroundConfig {
            palette,
            mode: opts.mode.unwrap_or(d.mode),
            line_count,
            initial_lines: opts.initial_lines.unwrap_or(line_count).min(line_count),
            segments: opts.segments.unwrap_or(d.segments),
            bounds: opts.bounds.unwrap_or(d.bounds),
            branch_count: opts.branch_count.unwrap_or(d.branch_count).min(max_branches),
            max_branches,
            spawn_interval_ms: opts.spawn_interval_ms.unwrap_or(d.spawn_interval_ms),
            fov_degrees: opts.fov.unwrap_or(d.fov_degrees),
            camera_z: opts.camera_z.unwrap_or(d.camera_z),
            rotation_idle_ms: opts.rotation_idle_ms.unwrap_or(d.rotation_idle_ms),
            warmup_ms: opts.warmup_ms.unwrap_or(d.warmup_ms),
            dust_count: opts.dust_count.unwrap_or(d.dust_count),
            fog_density: opts.fog_density.unwrap_or(d.fog_density),
            seed: opts.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl BackgroundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { field, reason })
            }
        }
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;

        check(self.segments >= 2, "segments", "must be at least 2")?;
        check(
            self.bounds.is_finite() && self.bounds > 0.0,
            "bounds",
            "must be a positive number",
        )?;
        check(self.max_branches >= 1, "maxBranches", "must be at least 1")?;
        check(
            self.fov_degrees > 0.0 && self.fov_degrees < 180.0,
            "fov",
            "must be between 0 and 180 degrees",
        )?;
        check(
            self.camera_z.is_finite() && self.camera_z > 0.0,
            "cameraZ",
            "must be a positive number",
        )?;
        check(
            finite_non_negative(self.spawn_interval_ms),
            "spawnIntervalMs",
            "must be a non-negative number",
        )?;
        check(
            finite_non_negative(self.rotation_idle_ms),
            "rotationIdleMs",
            "must be a non-negative number",
        )?;
        check(
            finite_non_negative(self.warmup_ms),
            "warmupMs",
            "must be a non-negative number",
        )?;
        check(
            self.fog_density.is_finite() && self.fog_density >= 0.0,
            "fogDensity",
            "must be a non-negative number",
        )?;
        Ok(())
    }
}
