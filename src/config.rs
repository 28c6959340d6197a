//! Tunables for a reveal session.
//!
//! `Config::default()` is the plain reveal: agents enter from a ring, light up at
//! a fixed per-agent rate and completion waits for every agent. The interactive
//! preset swaps in edge spawning, distance-driven shading, a 95% completion
//! threshold and pointer interaction.

use thiserror::Error;

use crate::color::Rgb;

/// How an agent is drawn each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// 2x2 filled square at the agent position.
    Points,
    /// Filled circle of radius `size / 2`.
    Circles,
}

/// Which color-weight policy every agent in a session follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendPolicy {
    /// Add the agent's `color_blend_rate` every frame.
    FixedRate,
    /// Ease toward a weight derived from the distance to target.
    DistanceDriven,
}

/// Where newly created agents start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnStrategy {
    /// On a circle around the surface center with radius `(w + h) / 2`.
    Ring,
    /// Just past one of the four surface edges.
    Edges,
}

/// Overrides read from `data-*` attributes, besides `interactive`.
pub const ATTRIBUTES: &[&str] = &[
    "text",
    "stride",
    "completion-ratio",
    "completion-delay",
    "max-font",
    "draw",
    "blend",
    "spawn",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub text: String,
    /// Sample every Nth pixel of the rasterized glyph.
    pub pixel_stride: usize,
    pub max_font_px: f32,
    pub min_font_px: f32,
    pub reveal_color: Rgb,
    pub draw_mode: DrawMode,
    pub blend: BlendPolicy,
    pub spawn: SpawnStrategy,

    /// Distance under which an agent counts as arrived for completion.
    pub arrival_tolerance: f32,
    /// Fraction of the pool that must be arrived before completion fires.
    pub completion_ratio: f32,
    pub completion_delay_ms: i32,

    pub interactive: bool,
    pub influence_radius: f32,
    /// Displacement at zero distance from the pointer.
    pub push_distance: f32,
    /// Fraction of the remaining offset recovered per frame once out of influence.
    pub return_damping: f32,
    pub glitter_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: "xuyu".to_string(),
            pixel_stride: 12,
            max_font_px: 240.0,
            min_font_px: 12.0,
            reveal_color: Rgb::WHITE,
            draw_mode: DrawMode::Points,
            blend: BlendPolicy::FixedRate,
            spawn: SpawnStrategy::Ring,
            arrival_tolerance: 10.0,
            completion_ratio: 1.0,
            completion_delay_ms: 500,
            interactive: false,
            influence_radius: 120.0,
            push_distance: 40.0,
            return_damping: 0.15,
            glitter_speed: 0.25,
        }
    }
}

impl Config {
    pub fn interactive_preset() -> Self {
        Self {
            interactive: true,
            completion_ratio: 0.95,
            blend: BlendPolicy::DistanceDriven,
            spawn: SpawnStrategy::Edges,
            ..Self::default()
        }
    }

    /// Build a validated config from attribute lookups. An explicit
    /// `interactive` flag picks the preset; otherwise the `interactive`
    /// attribute does. The remaining [`ATTRIBUTES`] are applied on top.
    pub fn from_attributes<F>(interactive: Option<bool>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let interactive = match (interactive, lookup("interactive")) {
            (Some(flag), _) => flag,
            (None, Some(value)) => parse_bool(value.trim())?,
            (None, None) => false,
        };
        let mut config = if interactive {
            Self::interactive_preset()
        } else {
            Self::default()
        };
        for name in ATTRIBUTES {
            if let Some(value) = lookup(name) {
                config.apply_attribute(name, &value)?;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply a single `data-*` style override, e.g. `("stride", "8")`.
    pub fn apply_attribute(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match name {
            "text" => self.text = value.to_string(),
            "stride" => self.pixel_stride = parse("stride", value)?,
            "interactive" => self.interactive = parse_bool(value)?,
            "completion-ratio" => self.completion_ratio = parse("completion-ratio", value)?,
            "completion-delay" => self.completion_delay_ms = parse("completion-delay", value)?,
            "max-font" => self.max_font_px = parse("max-font", value)?,
            "draw" => {
                self.draw_mode = match value {
                    "points" => DrawMode::Points,
                    "circles" => DrawMode::Circles,
                    _ => return Err(invalid("draw", value)),
                }
            }
            "blend" => {
                self.blend = match value {
                    "fixed" => BlendPolicy::FixedRate,
                    "distance" => BlendPolicy::DistanceDriven,
                    _ => return Err(invalid("blend", value)),
                }
            }
            "spawn" => {
                self.spawn = match value {
                    "ring" => SpawnStrategy::Ring,
                    "edges" => SpawnStrategy::Edges,
                    _ => return Err(invalid("spawn", value)),
                }
            }
            other => return Err(ConfigError::UnknownAttribute(other.to_string())),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        range("stride", self.pixel_stride as f64, 1.0, 256.0)?;
        range("completion-ratio", self.completion_ratio as f64, 0.0, 1.0)?;
        range("completion-delay", self.completion_delay_ms as f64, 0.0, 60_000.0)?;
        range("max-font", self.max_font_px as f64, self.min_font_px as f64, 2048.0)?;
        range("return-damping", self.return_damping as f64, 0.0, 1.0)?;
        if self.completion_ratio <= 0.0 {
            return Err(invalid("completion-ratio", &self.completion_ratio.to_string()));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(field, value))
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid("interactive", value)),
    }
}

fn invalid(field: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

fn range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value < min || value > max || value.is_nan() {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}
