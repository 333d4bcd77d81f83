//! Maps diagnostics onto pixel offsets along the bar.
use std::sync::Arc;

use crate::diagnostic::{
  Diagnostic,
  Severity,
};

/// A diagnostic placed on the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
  pub diagnostic: Arc<Diagnostic>,
  /// Pixel offset from the top of the bar, `0 <= y <= bar_height`.
  pub y:          u32,
  pub severity:   Severity,
}

impl Marker {
  pub fn tooltip(&self) -> String {
    self.diagnostic.tooltip()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
  /// Bottom margin so markers never sit flush against the bottom edge.
  pub vertical_offset: u32,
}

impl Default for LayoutMetrics {
  fn default() -> Self {
    Self {
      vertical_offset: 15,
    }
  }
}

impl LayoutMetrics {
  /// Offset of a marker for `line_number` in a document of `total_lines`.
  pub fn marker_y(&self, line_number: usize, total_lines: usize, bar_height: u32) -> u32 {
    let total_lines = total_lines.max(1);
    let ratio = ((line_number as f64 + 1.0) / total_lines as f64).clamp(0.0, 1.0);
    let usable = bar_height.saturating_sub(self.vertical_offset);
    (ratio * usable as f64).round() as u32
  }
}

/// Build markers for every diagnostic on `active_tab`, in input order.
///
/// Diagnostics on other tabs are skipped. `total_lines` should count the
/// trailing line too; zero is treated as a single-line document.
pub fn compute_markers(
  diagnostics: &[Arc<Diagnostic>],
  active_tab: usize,
  total_lines: usize,
  bar_height: u32,
  metrics: &LayoutMetrics,
) -> Vec<Marker> {
  diagnostics
    .iter()
    .filter(|diagnostic| diagnostic.tab_index == active_tab)
    .map(|diagnostic| {
      Marker {
        y:          metrics.marker_y(diagnostic.line_number, total_lines, bar_height),
        severity:   diagnostic.severity,
        diagnostic: Arc::clone(diagnostic),
      }
    })
    .collect()
}
