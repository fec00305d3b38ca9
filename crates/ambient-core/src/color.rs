//! Canonical color type, palette loading and the per-line color cycler.
//!
//! Options arrive from the page in several shapes (`0xRRGGBB` integers, CSS hex
//! strings, float triples). They are converted exactly once, at the palette
//! boundary, into [`Rgb`]; everything downstream only sees `Rgb`.

use crate::constants::{COLOR_STEP_JITTER, COLOR_STEP_MIN};
use crate::error::ConfigError;
use rand::Rng;
use serde::Deserialize;

/// Linear RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self { r, g, b }
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// A color as written in the page options.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    Hex(u32),
    Css(String),
    Triple([f32; 3]),
}

impl TryFrom<&ColorSpec> for Rgb {
    type Error = ConfigError;

    fn try_from(spec: &ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Hex(hex) if *hex <= 0xFF_FFFF => Ok(Rgb::from_hex(*hex)),
            ColorSpec::Hex(hex) => Err(ConfigError::InvalidColor(format!("{hex:#x}"))),
            ColorSpec::Css(text) => parse_css_hex(text),
            ColorSpec::Triple([r, g, b]) => {
                let in_range = |c: &f32| c.is_finite() && (0.0..=1.0).contains(c);
                if [r, g, b].into_iter().all(in_range) {
                    Ok(Rgb::new(*r, *g, *b))
                } else {
                    Err(ConfigError::InvalidColor(format!("[{r}, {g}, {b}]")))
                }
            }
        }
    }
}

/// Parse `#rrggbb`, `#rgb` or `0xrrggbb`.
fn parse_css_hex(text: &str) -> Result<Rgb, ConfigError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| ConfigError::InvalidColor(text.to_string()))?;
    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(ConfigError::InvalidColor(text.to_string())),
    };
    u32::from_str_radix(&expanded, 16)
        .map(Rgb::from_hex)
        .map_err(|_| ConfigError::InvalidColor(text.to_string()))
}

/// Non-empty ordered set of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn from_hex(hexes: &[u32]) -> Result<Self, ConfigError> {
        Self::new(hexes.iter().copied().map(Rgb::from_hex).collect())
    }

    pub fn from_specs(specs: &[ColorSpec]) -> Result<Self, ConfigError> {
        let colors = specs
            .iter()
            .map(Rgb::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Uniform draw with replacement; consecutive repeats are allowed.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: crate::constants::DEFAULT_PALETTE
                .iter()
                .copied()
                .map(Rgb::from_hex)
                .collect(),
        }
    }
}

/// Interpolates from a base color toward a target color, swapping in a new
/// random target each time progress completes.
///
/// `progress` always stays in `[0, 1)`.
#[derive(Clone, Debug)]
pub struct ColorCycler {
    base: Rgb,
    target: Rgb,
    progress: f32,
}

impl ColorCycler {
    pub fn new<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> Self {
        let base = palette.pick(rng);
        let target = palette.pick(rng);
        let progress = rng.gen::<f32>();
        Self::with_state(base, target, progress)
    }

    /// Explicit state; `progress` is clamped into `[0, 1)`.
    pub fn with_state(base: Rgb, target: Rgb, progress: f32) -> Self {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0 - f32::EPSILON)
        } else {
            0.0
        };
        Self {
            base,
            target,
            progress,
        }
    }

    pub fn base(&self) -> Rgb {
        self.base
    }

    pub fn target(&self) -> Rgb {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current(&self) -> Rgb {
        self.base.lerp(self.target, self.progress)
    }

    /// Advance by the standard randomized step.
    pub fn advance<R: Rng + ?Sized>(&mut self, palette: &Palette, rng: &mut R) -> Rgb {
        let step = COLOR_STEP_MIN + rng.gen::<f32>() * COLOR_STEP_JITTER;
        self.advance_by(step, palette, rng)
    }

    /// Advance by an explicit step. When progress reaches 1 the target becomes
    /// the new base, a fresh target is drawn and progress restarts at 0.
    pub fn advance_by<R: Rng + ?Sized>(
        &mut self,
        step: f32,
        palette: &Palette,
        rng: &mut R,
    ) -> Rgb {
        self.progress += step.max(0.0);
        if self.progress >= 1.0 || !self.progress.is_finite() {
            self.base = self.target;
            self.target = palette.pick(rng);
            self.progress = 0.0;
        }
        self.current()
    }
}
