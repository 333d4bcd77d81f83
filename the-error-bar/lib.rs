//! A vertical error bar for the editor.
//!
//! Every error and warning of the visible document is drawn as a small marker
//! whose offset along the bar is proportional to its line. Clicking a marker
//! scrolls to the diagnostic, hovering shows its message.

pub mod bar;
pub mod change;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod hook;
pub mod host;
pub mod layout;
pub mod model;
pub mod recompute;
pub mod render;

pub use bar::ErrorBar;
pub use change::has_changed;
pub use config::{
  Color,
  ErrorBarConfig,
  ThemeLookup,
};
pub use diagnostic::{
  Diagnostic,
  Severity,
};
pub use error::{
  ErrorBarError,
  Result,
};
pub use hit_test::{
  HitBand,
  find_marker_at,
};
pub use host::{
  CursorKind,
  EditorHost,
  count_lines,
};
pub use layout::{
  LayoutMetrics,
  Marker,
  compute_markers,
};
pub use model::{
  MarkerModel,
  PublishOutcome,
  UpdateTicket,
};
pub use recompute::BarEvent;
pub use render::{
  Rect,
  Surface,
};
