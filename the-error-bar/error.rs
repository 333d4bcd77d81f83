use thiserror::Error;

/// Failures contained inside the error bar.
///
/// None of these cross the public event entry points; they are logged and the
/// previously published markers stay visible.
#[derive(Debug, Error)]
pub enum ErrorBarError {
  /// The document text could not be read while recomputing markers.
  #[error("failed to read document for tab {tab}: {reason}")]
  DocumentRead { tab: usize, reason: String },
  /// The background recompute worker is gone or refused the request.
  #[error("failed to schedule marker recompute: {0}")]
  Scheduling(String),
  #[error("failed to parse error bar config: {0}")]
  Config(#[from] toml::de::Error),
  #[error("invalid color `{0}`, expected `#rrggbb`")]
  InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, ErrorBarError>;
