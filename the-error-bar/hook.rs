//! Queue between the error bar and its recompute worker.
//!
//! `ErrorBar::on_update` runs on the UI thread (or any producer thread) and
//! must never wait on a document read. It pushes a recompute request into a
//! bounded channel with [`send_blocking`]; a tokio task owned by the bar pulls
//! requests off that channel, optionally coalescing bursts, and hands them to
//! the blocking pool. When the bar is dropped the channel closes and the task
//! exits.

use std::time::Duration;

use futures_executor::block_on;
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    error::TrySendError,
  },
  time::Instant,
};

use crate::error::{
  ErrorBarError,
  Result,
};

/// Longest a caller may block on a full queue before the event is dropped.
const SEND_TIMEOUT_MS: u64 = 2;

const QUEUE_CAPACITY: usize = 256;

/// A background task that receives events over a channel and may debounce
/// them.
pub trait AsyncHook: Send + 'static + Sized {
  type Event: Send + 'static;

  /// Called for every received event. Returns the deadline at which
  /// [`AsyncHook::finish_debounce`] should run, or `None` if the event was
  /// handled right away.
  fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

  /// Called once the debounce deadline passes without a new event.
  fn finish_debounce(&mut self);

  /// Start the hook on the current tokio runtime.
  ///
  /// Outside a runtime no task is started and every send on the returned
  /// channel fails, which callers report as a scheduling error.
  fn spawn(self) -> Sender<Self::Event> {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    } else {
      log::warn!("No tokio runtime available, error bar updates are disabled");
    }
    tx
  }
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::Receiver<Hook::Event>) {
  let mut deadline: Option<Instant> = None;
  loop {
    // `None` means the debounce window closed before the next request.
    let received = match deadline {
      Some(at) => tokio::time::timeout_at(at, rx.recv()).await.ok(),
      None => Some(rx.recv().await),
    };
    match received {
      None => {
        hook.finish_debounce();
        deadline = None;
      },
      Some(Some(event)) => deadline = hook.handle_event(event, deadline),
      // every sender dropped: the bar is gone
      Some(None) => break,
    }
  }
}

/// Send `data` without freezing the caller.
///
/// Tries a non-blocking send first. If the queue is full and we are inside a
/// runtime, waits at most `SEND_TIMEOUT_MS` before giving up.
pub fn send_blocking<T>(tx: &Sender<T>, data: T) -> Result<()> {
  match tx.try_send(data) {
    Ok(()) => Ok(()),
    Err(TrySendError::Full(data)) => {
      if tokio::runtime::Handle::try_current().is_err() {
        return Err(ErrorBarError::Scheduling("recompute queue is full".into()));
      }
      block_on(tx.send_timeout(data, Duration::from_millis(SEND_TIMEOUT_MS)))
        .map_err(|_| ErrorBarError::Scheduling("recompute queue is full".into()))
    },
    Err(TrySendError::Closed(_)) => {
      Err(ErrorBarError::Scheduling(
        "recompute worker is not running".into(),
      ))
    },
  }
}
