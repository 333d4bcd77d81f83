//! Off-thread marker recomputation.
//!
//! Requests flow UI thread -> [`RecomputeHook`] (async task) -> tokio blocking
//! pool, where the document is read and the markers are laid out and
//! published. The outcome travels back to the UI thread as a [`BarEvent`].
use std::{
  sync::Arc,
  time::Duration,
};

use tokio::{
  sync::mpsc::UnboundedSender,
  time::Instant,
};

use crate::{
  diagnostic::Diagnostic,
  error::{
    ErrorBarError,
    Result,
  },
  hook::AsyncHook,
  host::{
    EditorHost,
    count_lines,
  },
  layout::{
    LayoutMetrics,
    compute_markers,
  },
  model::{
    MarkerModel,
    PublishOutcome,
    UpdateTicket,
  },
};

/// Result of a recompute, delivered to the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarEvent {
  /// New markers are live. The text area needs a repaint too if `changed`.
  Published { seq: u64, changed: bool },
  /// A newer update had already been published.
  Superseded { seq: u64 },
  /// The recompute failed; the previous markers are still shown.
  Aborted { seq: u64 },
}

#[derive(Debug, Clone)]
pub struct RecomputeRequest {
  pub ticket:      UpdateTicket,
  pub diagnostics: Arc<[Arc<Diagnostic>]>,
  /// Bar height captured when the update was requested.
  pub bar_height:  u32,
}

/// Read the active document, lay out `request`'s diagnostics and publish them.
///
/// Leaves the model untouched if the document cannot be read.
pub fn recompute(
  host: &dyn EditorHost,
  model: &MarkerModel,
  metrics: &LayoutMetrics,
  line_offset: usize,
  request: &RecomputeRequest,
) -> Result<PublishOutcome> {
  let tab = host.active_tab_index();
  let text = host.document_text(tab).map_err(|err| {
    ErrorBarError::DocumentRead {
      tab,
      reason: format!("{err:#}"),
    }
  })?;
  let total_lines = count_lines(&text).saturating_add(line_offset);
  let markers = compute_markers(
    &request.diagnostics,
    tab,
    total_lines,
    request.bar_height,
    metrics,
  );
  Ok(model.publish(request.ticket, markers))
}

pub(crate) struct RecomputeContext {
  pub host:        Arc<dyn EditorHost>,
  pub model:       Arc<MarkerModel>,
  pub metrics:     LayoutMetrics,
  pub line_offset: usize,
  pub events:      UnboundedSender<BarEvent>,
}

impl RecomputeContext {
  fn run(&self, request: RecomputeRequest) {
    let seq = request.ticket.seq();
    let event = match recompute(
      self.host.as_ref(),
      &self.model,
      &self.metrics,
      self.line_offset,
      &request,
    ) {
      Ok(PublishOutcome::Applied { changed }) => BarEvent::Published { seq, changed },
      Ok(PublishOutcome::Superseded { published }) => {
        log::debug!("Dropping error bar update {seq}, update {published} is newer");
        BarEvent::Superseded { seq }
      },
      Err(err) => {
        log::debug!("Skipping error bar update {seq}: {err}");
        BarEvent::Aborted { seq }
      },
    };
    // the bar may already be gone
    let _ = self.events.send(event);
  }
}

pub(crate) struct RecomputeHook {
  context:  Arc<RecomputeContext>,
  debounce: Option<Duration>,
  pending:  Option<RecomputeRequest>,
}

impl RecomputeHook {
  pub fn new(context: RecomputeContext, debounce: Option<Duration>) -> Self {
    Self {
      context: Arc::new(context),
      debounce,
      pending: None,
    }
  }

  fn dispatch(&self, request: RecomputeRequest) {
    let seq = request.ticket.seq();
    let context = Arc::clone(&self.context);
    let events = self.context.events.clone();
    let task = tokio::task::spawn_blocking(move || context.run(request));
    tokio::spawn(async move {
      if let Err(err) = task.await {
        log::error!("Error bar recompute {seq} failed: {err}");
        let _ = events.send(BarEvent::Aborted { seq });
      }
    });
  }
}

impl AsyncHook for RecomputeHook {
  type Event = RecomputeRequest;

  fn handle_event(&mut self, request: RecomputeRequest, _: Option<Instant>) -> Option<Instant> {
    match self.debounce {
      Some(debounce) => {
        // requests can reach the channel out of ticket order
        let newer = self
          .pending
          .as_ref()
          .is_none_or(|pending| request.ticket > pending.ticket);
        if newer {
          self.pending = Some(request);
        }
        Some(Instant::now() + debounce)
      },
      None => {
        self.dispatch(request);
        None
      },
    }
  }

  fn finish_debounce(&mut self) {
    if let Some(request) = self.pending.take() {
      self.dispatch(request);
    }
  }
}

#[cfg(test)]
mod tests {
  use anyhow::bail;
  use ropey::Rope;

  use super::*;
  use crate::host::CursorKind;

  struct StaticHost {
    tab:  usize,
    text: Option<&'static str>,
  }

  impl EditorHost for StaticHost {
    fn active_tab_index(&self) -> usize {
      self.tab
    }

    fn document_text(&self, tab: usize) -> anyhow::Result<Rope> {
      match self.text {
        Some(text) => Ok(Rope::from_str(text)),
        None => bail!("tab {tab} is being swapped"),
      }
    }

    fn scroll_to_line(&self, _: &Diagnostic) {}

    fn set_tooltip(&self, _: Option<&str>) {}

    fn set_cursor(&self, _: CursorKind) {}

    fn repaint_bar(&self) {}

    fn repaint_text_area(&self) {}
  }

  fn request(model: &MarkerModel, diagnostics: Vec<Diagnostic>, bar_height: u32) -> RecomputeRequest {
    RecomputeRequest {
      ticket: model.reserve(),
      diagnostics: diagnostics.into_iter().map(Arc::new).collect(),
      bar_height,
    }
  }

  #[test]
  fn uses_active_tab_and_document_length() {
    let host = StaticHost {
      tab:  1,
      text: Some("a\nb\nc\nd"),
    };
    let model = MarkerModel::new();
    let req = request(
      &model,
      vec![Diagnostic::error(0, 0, "hidden"), Diagnostic::warning(1, 1, "shown")],
      115,
    );

    let outcome = recompute(&host, &model, &LayoutMetrics::default(), 0, &req).unwrap();
    assert_eq!(outcome, PublishOutcome::Applied { changed: true });
    let markers = model.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].diagnostic.message, "shown");
    // line 1 of 4
    assert_eq!(markers[0].y, 50);
  }

  #[test]
  fn line_offset_extends_the_document() {
    let host = StaticHost {
      tab:  0,
      text: Some("a\nb\nc\nd"),
    };
    let model = MarkerModel::new();
    let req = request(&model, vec![Diagnostic::error(0, 3, "e")], 115);
    recompute(&host, &model, &LayoutMetrics::default(), 1, &req).unwrap();
    assert_eq!(model.markers()[0].y, 80);
  }

  #[test]
  fn unreadable_document_keeps_markers() {
    let model = MarkerModel::new();
    let good = StaticHost {
      tab:  0,
      text: Some("x\ny"),
    };
    let req = request(&model, vec![Diagnostic::error(0, 0, "kept")], 115);
    recompute(&good, &model, &LayoutMetrics::default(), 0, &req).unwrap();

    let broken = StaticHost { tab: 0, text: None };
    let req = request(&model, vec![], 115);
    let err = recompute(&broken, &model, &LayoutMetrics::default(), 0, &req).unwrap_err();
    assert!(matches!(err, ErrorBarError::DocumentRead { tab: 0, .. }));
    assert_eq!(model.markers()[0].diagnostic.message, "kept");
    assert_eq!(model.published_seq(), 1);
  }

  #[test]
  fn huge_line_offset_saturates() {
    let host = StaticHost {
      tab:  0,
      text: Some("a\nb"),
    };
    let model = MarkerModel::new();
    let req = request(&model, vec![Diagnostic::error(0, 1, "e")], 115);
    let outcome = recompute(&host, &model, &LayoutMetrics::default(), usize::MAX, &req).unwrap();
    assert_eq!(outcome, PublishOutcome::Applied { changed: true });
    assert_eq!(model.markers()[0].y, 0);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn debounce_keeps_newest_ticket_when_requests_arrive_out_of_order() {
    let model = Arc::new(MarkerModel::new());
    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
    let context = RecomputeContext {
      host:        Arc::new(StaticHost {
        tab:  0,
        text: Some("a\nb\nc\nd"),
      }),
      model:       Arc::clone(&model),
      metrics:     LayoutMetrics::default(),
      line_offset: 0,
      events:      events_tx,
    };
    let mut hook = RecomputeHook::new(context, Some(Duration::from_millis(10)));

    let older = request(&model, vec![Diagnostic::error(0, 0, "older")], 115);
    let newer = request(&model, vec![Diagnostic::error(0, 1, "newer")], 115);
    let newer_seq = newer.ticket.seq();

    hook.handle_event(newer, None);
    hook.handle_event(older, None);
    hook.finish_debounce();

    let event = events_rx.recv().await.unwrap();
    assert_eq!(event, BarEvent::Published {
      seq:     newer_seq,
      changed: true,
    });
    assert_eq!(model.markers()[0].diagnostic.message, "newer");
  }
}
