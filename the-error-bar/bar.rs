//! The error bar widget state shared between the UI thread and the recompute
//! worker.
//!
//! ## Threads
//!
//! - [`ErrorBar::on_update`] may be called from any thread. It reserves an
//!   update ticket and hands the diagnostics to a background hook task.
//! - The document read and layout run on tokio's blocking pool.
//! - Outcomes come back over an event channel which the UI thread drains with
//!   [`ErrorBar::drain_events`], triggering the repaints.
//! - Pointer handling and painting read the published markers under the
//!   model's read lock.
use std::{
  sync::{
    Arc,
    atomic::{
      AtomicBool,
      AtomicU32,
      Ordering,
    },
  },
  time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::mpsc::{
  self,
  Sender,
  UnboundedReceiver,
};

use crate::{
  config::ErrorBarConfig,
  diagnostic::Diagnostic,
  hook::{
    AsyncHook,
    send_blocking,
  },
  host::{
    CursorKind,
    EditorHost,
  },
  layout::Marker,
  model::MarkerModel,
  recompute::{
    BarEvent,
    RecomputeContext,
    RecomputeHook,
    RecomputeRequest,
  },
  render::{
    Surface,
    paint_markers,
  },
};

pub struct ErrorBar {
  config:       Arc<ErrorBarConfig>,
  host:         Arc<dyn EditorHost>,
  model:        Arc<MarkerModel>,
  bar_height:   AtomicU32,
  /// Last full diagnostics list, replayed on resize and tab switches.
  diagnostics:  Mutex<Arc<[Arc<Diagnostic>]>>,
  recompute_tx: Sender<RecomputeRequest>,
  events:       Mutex<UnboundedReceiver<BarEvent>>,
  hovering:     AtomicBool,
}

impl ErrorBar {
  /// Create a bar of the given pixel height.
  ///
  /// Must be called inside a tokio runtime for updates to be processed;
  /// otherwise every update is logged and skipped.
  pub fn new(config: ErrorBarConfig, host: Arc<dyn EditorHost>, height: u32) -> Self {
    let model = Arc::new(MarkerModel::new());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let debounce = (config.debounce_ms > 0).then(|| Duration::from_millis(config.debounce_ms));

    let context = RecomputeContext {
      host:        Arc::clone(&host),
      model:       Arc::clone(&model),
      metrics:     config.layout_metrics(),
      line_offset: config.line_offset,
      events:      events_tx,
    };
    let recompute_tx = RecomputeHook::new(context, debounce).spawn();

    Self {
      config: Arc::new(config),
      host,
      model,
      bar_height: AtomicU32::new(height),
      diagnostics: Mutex::new(Arc::from(Vec::new())),
      recompute_tx,
      events: Mutex::new(events_rx),
      hovering: AtomicBool::new(false),
    }
  }

  pub fn config(&self) -> &ErrorBarConfig {
    &self.config
  }

  pub fn model(&self) -> &MarkerModel {
    &self.model
  }

  /// Snapshot of the markers currently shown.
  pub fn markers(&self) -> Vec<Marker> {
    self.model.markers()
  }

  pub fn height(&self) -> u32 {
    self.bar_height.load(Ordering::Relaxed)
  }

  pub fn preferred_size(&self) -> (u32, u32) {
    self.config.preferred_size(self.height())
  }

  /// Replace the diagnostics and schedule a recompute for the active tab.
  pub fn on_update(&self, diagnostics: Vec<Diagnostic>) {
    let diagnostics: Arc<[Arc<Diagnostic>]> = diagnostics.into_iter().map(Arc::new).collect();
    // Held until the request is queued, so the stored list always belongs to
    // the newest ticket and requests enter the queue in ticket order.
    let mut last = self.diagnostics.lock();
    *last = Arc::clone(&diagnostics);
    self.schedule(diagnostics);
  }

  /// Re-run the last diagnostics, e.g. after the active tab changed.
  pub fn refresh(&self) {
    let last = self.diagnostics.lock();
    self.schedule(last.clone());
  }

  pub fn on_resize(&self, height: u32) {
    if self.bar_height.swap(height, Ordering::Relaxed) != height {
      self.refresh();
    }
  }

  /// Callers hold the `diagnostics` lock.
  fn schedule(&self, diagnostics: Arc<[Arc<Diagnostic>]>) {
    let request = RecomputeRequest {
      ticket: self.model.reserve(),
      diagnostics,
      bar_height: self.height(),
    };
    let seq = request.ticket.seq();
    if let Err(err) = send_blocking(&self.recompute_tx, request) {
      log::warn!("Skipping error bar update {seq}: {err}");
    }
  }

  /// Scroll to the diagnostic under `y`. Returns whether a marker was hit.
  pub fn on_pointer_click(&self, y: i32) -> bool {
    match self.model.marker_at(y, self.config.hit_band()) {
      Some(marker) => {
        self.host.scroll_to_line(&marker.diagnostic);
        true
      },
      None => false,
    }
  }

  /// Show the tooltip for the marker under `y`, clearing it when the pointer
  /// leaves all markers. Returns whether a marker was hit.
  pub fn on_pointer_move(&self, y: i32) -> bool {
    match self.model.marker_at(y, self.config.hit_band()) {
      Some(marker) => {
        self.host.set_tooltip(Some(marker.tooltip().as_str()));
        self.host.set_cursor(CursorKind::Hand);
        self.hovering.store(true, Ordering::Relaxed);
        true
      },
      None => {
        if self.hovering.swap(false, Ordering::Relaxed) {
          self.host.set_tooltip(None);
          self.host.set_cursor(CursorKind::Default);
        }
        false
      },
    }
  }

  /// Apply finished recomputes. Call from the UI thread's event loop.
  ///
  /// Every published update repaints the bar; the text area is repainted
  /// only when marker positions or count changed.
  pub fn drain_events(&self) -> Vec<BarEvent> {
    let events: Vec<BarEvent> = {
      let mut rx = self.events.lock();
      std::iter::from_fn(|| rx.try_recv().ok()).collect()
    };

    for event in &events {
      if let BarEvent::Published { changed, .. } = *event {
        self.host.repaint_bar();
        if changed {
          self.host.repaint_text_area();
        }
      }
    }
    events
  }

  pub fn paint(&self, surface: &mut dyn Surface, width: u32) {
    let height = self.height();
    self
      .model
      .with_markers(|markers| paint_markers(surface, markers, width, height, &self.config));
  }
}
