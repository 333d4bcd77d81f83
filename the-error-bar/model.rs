//! Current/previous marker lists for one bar instance.
//!
//! Recomputes may run on worker threads and finish out of order. Every update
//! reserves a sequence number when it is requested and only publishes if no
//! newer update has been published in the meantime, so a slow, older
//! recompute can never replace a fresher result.
use std::{
  mem,
  sync::{
    Arc,
    atomic::{
      AtomicU64,
      Ordering,
    },
  },
};

use parking_lot::RwLock;

use crate::{
  change::has_changed,
  diagnostic::Diagnostic,
  hit_test::{
    HitBand,
    find_marker_at,
  },
  layout::{
    LayoutMetrics,
    Marker,
    compute_markers,
  },
};

/// Sequence number reserved for a single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UpdateTicket(u64);

impl UpdateTicket {
  pub fn seq(self) -> u64 {
    self.0
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
  /// The markers replaced the current list. `changed` reports whether
  /// positions or count differ from the list they replaced.
  Applied { changed: bool },
  /// A newer update was already published; the markers were dropped.
  Superseded { published: u64 },
}

#[derive(Debug, Default)]
struct MarkerLists {
  current:   Vec<Marker>,
  previous:  Vec<Marker>,
  published: u64,
}

#[derive(Debug, Default)]
pub struct MarkerModel {
  lists:    RwLock<MarkerLists>,
  next_seq: AtomicU64,
}

impl MarkerModel {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserve the next sequence number. Call this at request time so the
  /// publish order follows the request order.
  pub fn reserve(&self) -> UpdateTicket {
    UpdateTicket(self.next_seq.fetch_add(1, Ordering::Relaxed) + 1)
  }

  /// Swap `markers` in as the current list unless a newer ticket already won.
  pub fn publish(&self, ticket: UpdateTicket, markers: Vec<Marker>) -> PublishOutcome {
    let mut guard = self.lists.write();
    let lists = &mut *guard;
    if ticket.0 <= lists.published {
      return PublishOutcome::Superseded {
        published: lists.published,
      };
    }

    lists.previous = mem::replace(&mut lists.current, markers);
    lists.published = ticket.0;
    PublishOutcome::Applied {
      changed: has_changed(&lists.previous, &lists.current),
    }
  }

  /// Recompute and publish in one step. The layout runs outside the lock.
  pub fn update(
    &self,
    diagnostics: &[Arc<Diagnostic>],
    active_tab: usize,
    total_lines: usize,
    bar_height: u32,
    metrics: &LayoutMetrics,
  ) -> PublishOutcome {
    let ticket = self.reserve();
    let markers = compute_markers(diagnostics, active_tab, total_lines, bar_height, metrics);
    self.publish(ticket, markers)
  }

  /// Run `f` over the current list while holding the read lock.
  pub fn with_markers<R>(&self, f: impl FnOnce(&[Marker]) -> R) -> R {
    f(&self.lists.read().current)
  }

  pub fn markers(&self) -> Vec<Marker> {
    self.lists.read().current.clone()
  }

  pub fn previous_markers(&self) -> Vec<Marker> {
    self.lists.read().previous.clone()
  }

  pub fn marker_at(&self, pointer_y: i32, band: HitBand) -> Option<Marker> {
    self.with_markers(|markers| find_marker_at(markers, pointer_y, band).cloned())
  }

  /// Sequence number of the last applied update, 0 before the first one.
  pub fn published_seq(&self) -> u64 {
    self.lists.read().published
  }

  pub fn len(&self) -> usize {
    self.lists.read().current.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
