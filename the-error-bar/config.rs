//! Error bar configuration: colors, marker metrics and scheduling knobs.
use serde::{
  Deserialize,
  Deserializer,
};

use crate::{
  error::ErrorBarError,
  hit_test::HitBand,
  layout::LayoutMetrics,
};

pub const ERROR_COLOR_KEY: &str = "errorbar.errorcolor";
pub const WARNING_COLOR_KEY: &str = "errorbar.warningcolor";
pub const BACKGROUND_COLOR_KEY: &str = "errorbar.backgroundcolor";

/// RGBA color representation using normalized floats (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
  pub r: f32,
  pub g: f32,
  pub b: f32,
  pub a: f32,
}

impl Color {
  pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
    Self { r, g, b, a }
  }

  /// Create an opaque color from a `0xRRGGBB` value
  pub fn from_hex(hex: u32) -> Self {
    let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let b = (hex & 0xFF) as f32 / 255.0;
    Self { r, g, b, a: 1.0 }
  }

  /// Parse a `#rrggbb` string.
  pub fn parse(raw: &str) -> Result<Self, ErrorBarError> {
    let invalid = || ErrorBarError::InvalidColor(raw.to_string());
    let digits = raw.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(invalid());
    }
    u32::from_str_radix(digits, 16)
      .map(Self::from_hex)
      .map_err(|_| invalid())
  }
}

impl<'de> Deserialize<'de> for Color {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Color::parse(&raw).map_err(serde::de::Error::custom)
  }
}

/// Source of themed colors, keyed by names such as [`ERROR_COLOR_KEY`].
pub trait ThemeLookup {
  fn color_for(&self, key: &str, default: Color) -> Color;
}

/// Theme files are TOML; keys may be written flat (`"errorbar.errorcolor"`)
/// or as a nested `[errorbar]` table.
impl ThemeLookup for toml::Table {
  fn color_for(&self, key: &str, default: Color) -> Color {
    let value = self.get(key).or_else(|| {
      let mut parts = key.split('.');
      let mut value = self.get(parts.next()?)?;
      for part in parts {
        value = value.as_table()?.get(part)?;
      }
      Some(value)
    });

    match value.and_then(toml::Value::as_str).map(Color::parse) {
      Some(Ok(color)) => color,
      Some(Err(err)) => {
        log::warn!("Ignoring theme key `{key}`: {err}");
        default
      },
      None => default,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ErrorBarConfig {
  pub error_color:        Color,
  pub warning_color:      Color,
  pub background_color:   Color,
  /// Preferred (and minimum) width of the bar in pixels.
  pub preferred_width:    u32,
  pub marker_height:      u32,
  /// Extra pixels above and below a marker that still register a hit.
  pub hit_tolerance:      u32,
  /// Bottom margin kept free of markers.
  pub vertical_offset:    u32,
  pub marker_inset_left:  u32,
  pub marker_inset_right: u32,
  /// Lines added to the counted document length, for producers whose line
  /// numbers include generated boilerplate.
  pub line_offset:        usize,
  /// Coalesce bursts of updates arriving within this window. 0 disables.
  pub debounce_ms:        u64,
}

impl Default for ErrorBarConfig {
  fn default() -> Self {
    Self {
      error_color:        Color::from_hex(0xED2630),
      warning_color:      Color::from_hex(0xFFC30E),
      background_color:   Color::from_hex(0x2C343D),
      preferred_width:    12,
      marker_height:      4,
      hit_tolerance:      2,
      vertical_offset:    15,
      marker_inset_left:  2,
      marker_inset_right: 1,
      line_offset:        0,
      debounce_ms:        0,
    }
  }
}

impl ErrorBarConfig {
  pub fn from_toml(source: &str) -> Result<Self, ErrorBarError> {
    Ok(toml::from_str(source)?)
  }

  /// Overlay the three themed colors, keeping the current values as fallbacks.
  pub fn with_theme(mut self, theme: &dyn ThemeLookup) -> Self {
    self.error_color = theme.color_for(ERROR_COLOR_KEY, self.error_color);
    self.warning_color = theme.color_for(WARNING_COLOR_KEY, self.warning_color);
    self.background_color = theme.color_for(BACKGROUND_COLOR_KEY, self.background_color);
    self
  }

  pub fn layout_metrics(&self) -> LayoutMetrics {
    LayoutMetrics {
      vertical_offset: self.vertical_offset,
    }
  }

  pub fn hit_band(&self) -> HitBand {
    HitBand {
      tolerance:     self.hit_tolerance,
      marker_height: self.marker_height,
    }
  }

  /// Preferred size for a bar of the given height, as `(width, height)`.
  pub fn preferred_size(&self, height: u32) -> (u32, u32) {
    (self.preferred_width, height)
  }
}
