//! Diagnostics as pushed by the external checker.
use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};

/// Describes the severity level of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Warning,
  Error,
}

impl Severity {
  /// Prefix used for hover tooltips.
  pub fn label(self) -> &'static str {
    match self {
      Self::Error => "Error",
      Self::Warning => "Warning",
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A compiler-reported problem tied to a tab and a 0-based line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub tab_index:   usize,
  pub line_number: usize,
  pub message:     String,
  pub severity:    Severity,
}

impl Diagnostic {
  pub fn new(
    tab_index: usize,
    line_number: usize,
    severity: Severity,
    message: impl Into<String>,
  ) -> Self {
    Self {
      tab_index,
      line_number,
      message: message.into(),
      severity,
    }
  }

  pub fn error(tab_index: usize, line_number: usize, message: impl Into<String>) -> Self {
    Self::new(tab_index, line_number, Severity::Error, message)
  }

  pub fn warning(tab_index: usize, line_number: usize, message: impl Into<String>) -> Self {
    Self::new(tab_index, line_number, Severity::Warning, message)
  }

  #[inline]
  pub fn is_error(&self) -> bool {
    self.severity == Severity::Error
  }

  /// Text shown when hovering this diagnostic's marker, e.g. `Error: missing ;`.
  pub fn tooltip(&self) -> String {
    format!("{}: {}", self.severity.label(), self.message)
  }
}
