use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldError;
use crate::math::{parse_hex, Rgb};

/// Upper bound on the population. Connection search is all-pairs.
pub const MAX_PARTICLES: usize = 1024;

/// Largest accepted surface dimension, in pixels.
pub const MAX_DIMENSION: f32 = 16384.0;

const SITE_NAVY: Rgb = [1, 55, 166];
const SITE_SKY: Rgb = [96, 165, 250];
const SITE_ICE: Rgb = [191, 219, 254];
const SITE_YELLOW: Rgb = [250, 204, 21];
const SITE_ORANGE: Rgb = [251, 146, 60];
const BACKGROUND: Rgb = [8, 14, 38];

/// Mount configuration for one field.
///
/// Keys are camelCase when read from JSON and every key is optional;
/// missing keys take the neural preset's value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub connection_radius: f32,
    pub depth_enabled: bool,
    /// 0 = hard clear each frame, 1 = never fade (full trails).
    pub trail_fade: f32,
    #[serde(deserialize_with = "de_palette")]
    pub color_palette: Vec<Rgb>,
    pub margin: f32,
    pub max_depth: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub depth_speed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub pulse_speed_min: f32,
    pub pulse_speed_max: f32,
    pub pulse_amplitude: f32,
    pub opacity_scale: f32,
    /// Halo radius as a multiple of the body radius; 0 draws no halo.
    pub glow_scale: f32,
    pub line_width: f32,
    pub line_opacity: f32,
    /// Fixed line colour. When unset a line takes the colour of its first
    /// endpoint, which is the farther one once depth sorting has run.
    #[serde(deserialize_with = "de_optional_color")]
    pub link_color: Option<Rgb>,
    #[serde(deserialize_with = "de_color")]
    pub background: Rgb,
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::neural()
    }
}

impl FieldConfig {
    /// Flat dot network: hard clear, no depth, no halo.
    pub fn neural() -> Self {
        Self {
            particle_count: 40,
            connection_radius: 120.0,
            depth_enabled: false,
            trail_fade: 0.0,
            color_palette: vec![SITE_SKY, SITE_ICE, SITE_NAVY],
            margin: 20.0,
            max_depth: 600.0,
            speed_min: 0.1,
            speed_max: 0.5,
            depth_speed: 0.0,
            size_min: 1.5,
            size_max: 3.0,
            pulse_speed_min: 0.01,
            pulse_speed_max: 0.03,
            pulse_amplitude: 0.2,
            opacity_scale: 0.8,
            glow_scale: 0.0,
            line_width: 1.0,
            line_opacity: 0.5,
            link_color: None,
            background: BACKGROUND,
            seed: None,
        }
    }

    /// Glowing orbs drifting through depth, with motion trails.
    pub fn orb() -> Self {
        Self {
            particle_count: 30,
            connection_radius: 160.0,
            depth_enabled: true,
            trail_fade: 0.85,
            color_palette: vec![SITE_SKY, SITE_ICE, SITE_YELLOW, SITE_ORANGE],
            margin: 60.0,
            speed_min: 0.05,
            speed_max: 0.35,
            depth_speed: 0.8,
            size_min: 4.0,
            size_max: 10.0,
            pulse_speed_max: 0.04,
            pulse_amplitude: 0.35,
            opacity_scale: 0.9,
            glow_scale: 3.0,
            line_width: 0.8,
            line_opacity: 0.35,
            ..Self::neural()
        }
    }

    /// Parse a JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, FieldError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.particle_count > MAX_PARTICLES {
            return invalid(format!(
                "particleCount {} exceeds {}",
                self.particle_count, MAX_PARTICLES
            ));
        }
        // +inf is allowed: every pair connects.
        if self.connection_radius.is_nan() || self.connection_radius < 0.0 {
            return invalid(format!("connectionRadius {} must be >= 0", self.connection_radius));
        }
        check_unit("trailFade", self.trail_fade)?;
        check_unit("pulseAmplitude", self.pulse_amplitude)?;
        check_unit("opacityScale", self.opacity_scale)?;
        check_unit("lineOpacity", self.line_opacity)?;
        check_non_negative("margin", self.margin)?;
        check_non_negative("depthSpeed", self.depth_speed)?;
        check_non_negative("glowScale", self.glow_scale)?;
        if !(self.max_depth.is_finite() && self.max_depth > 0.0) {
            return invalid(format!("maxDepth {} must be finite and > 0", self.max_depth));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return invalid(format!("lineWidth {} must be finite and > 0", self.line_width));
        }
        check_range("speed", self.speed_min, self.speed_max)?;
        check_range("pulseSpeed", self.pulse_speed_min, self.pulse_speed_max)?;
        check_range("size", self.size_min, self.size_max)?;
        if self.size_min <= 0.0 {
            return invalid(format!("sizeMin {} must be > 0", self.size_min));
        }
        if self.color_palette.is_empty() {
            return invalid("colorPalette must not be empty".to_string());
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Result<(), FieldError> {
    Err(FieldError::InvalidConfiguration(msg))
}

fn check_unit(name: &str, v: f32) -> Result<(), FieldError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        invalid(format!("{name} {v} must lie in [0, 1]"))
    }
}

fn check_non_negative(name: &str, v: f32) -> Result<(), FieldError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        invalid(format!("{name} {v} must be finite and >= 0"))
    }
}

fn check_range(name: &str, min: f32, max: f32) -> Result<(), FieldError> {
    check_non_negative(name, min)?;
    check_non_negative(name, max)?;
    if min > max {
        return invalid(format!("{name} range [{min}, {max}] is inverted"));
    }
    Ok(())
}

/// A colour given either as `[r, g, b]` or as a `#rrggbb` string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Rgb(Rgb),
    Hex(String),
}

impl ColorSpec {
    fn resolve<E: serde::de::Error>(self) -> Result<Rgb, E> {
        match self {
            ColorSpec::Rgb(rgb) => Ok(rgb),
            ColorSpec::Hex(s) => {
                parse_hex(&s).ok_or_else(|| E::custom(format!("bad colour {s:?}")))
            }
        }
    }
}

fn de_color<'de, D: Deserializer<'de>>(d: D) -> Result<Rgb, D::Error> {
    ColorSpec::deserialize(d)?.resolve()
}

fn de_optional_color<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Rgb>, D::Error> {
    Option::<ColorSpec>::deserialize(d)?
        .map(ColorSpec::resolve)
        .transpose()
}

fn de_palette<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Rgb>, D::Error> {
    Vec::<ColorSpec>::deserialize(d)?
        .into_iter()
        .map(ColorSpec::resolve)
        .collect()
}
