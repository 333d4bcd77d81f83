//! Hooks into the editor that owns the bar.
use ropey::Rope;

use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
  #[default]
  Default,
  /// Pointing hand, shown while hovering a marker.
  Hand,
}

/// The editor services the bar relies on.
///
/// `active_tab_index` and `document_text` are called from the recompute
/// worker; everything else is called from the thread that drives the bar's
/// input and event draining (normally the UI thread).
pub trait EditorHost: Send + Sync + 'static {
  fn active_tab_index(&self) -> usize;

  /// Full text of the document open in `tab`. May block.
  fn document_text(&self, tab: usize) -> anyhow::Result<Rope>;

  /// Bring the diagnostic's tab and line into view.
  fn scroll_to_line(&self, diagnostic: &Diagnostic);

  fn set_tooltip(&self, text: Option<&str>);

  fn set_cursor(&self, cursor: CursorKind);

  /// Schedule a repaint of the bar itself.
  fn repaint_bar(&self);

  /// Schedule a repaint of the text area, whose gutter also reflects markers.
  fn repaint_text_area(&self);
}

/// Number of lines in `text`, counting a trailing line after the last break.
#[inline]
pub fn count_lines(text: &Rope) -> usize {
  text.len_lines()
}
