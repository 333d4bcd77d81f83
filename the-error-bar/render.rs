use crate::{
  config::{
    Color,
    ErrorBarConfig,
  },
  diagnostic::Severity,
  layout::Marker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
  pub x:      u32,
  pub y:      u32,
  pub width:  u32,
  pub height: u32,
}

/// Anything the bar can be drawn onto.
pub trait Surface {
  fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// Background first, then one inset bar per marker, colored by severity.
pub fn paint_markers(
  surface: &mut dyn Surface,
  markers: &[Marker],
  width: u32,
  height: u32,
  config: &ErrorBarConfig,
) {
  surface.fill_rect(
    Rect {
      x: 0,
      y: 0,
      width,
      height,
    },
    config.background_color,
  );

  let marker_width = width.saturating_sub(
    config
      .marker_inset_left
      .saturating_add(config.marker_inset_right),
  );
  if marker_width == 0 {
    return;
  }

  for marker in markers {
    let color = match marker.severity {
      Severity::Error => config.error_color,
      Severity::Warning => config.warning_color,
    };
    surface.fill_rect(
      Rect {
        x:      config.marker_inset_left,
        y:      marker.y,
        width:  marker_width,
        height: config.marker_height,
      },
      color,
    );
  }
}
