use crate::layout::Marker;

/// Whether the marker layout moved between two publishes.
///
/// Only counts and positions are compared; a marker that keeps its offset but
/// flips severity is not a change.
pub fn has_changed(previous: &[Marker], current: &[Marker]) -> bool {
  previous.len() != current.len()
    || previous
      .iter()
      .zip(current)
      .any(|(old, new)| old.y != new.y)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::diagnostic::Diagnostic;

  fn markers(ys: &[u32]) -> Vec<Marker> {
    ys.iter()
      .map(|&y| {
        let diagnostic = Arc::new(Diagnostic::error(0, 0, "e"));
        Marker {
          severity: diagnostic.severity,
          diagnostic,
          y,
        }
      })
      .collect()
  }

  #[test]
  fn empty_lists_are_unchanged() {
    assert!(!has_changed(&[], &[]));
  }

  #[test]
  fn length_difference_is_a_change() {
    assert!(has_changed(&markers(&[1]), &[]));
    assert!(has_changed(&markers(&[1, 2]), &markers(&[1, 2, 2])));
  }

  #[test]
  fn moved_marker_is_a_change() {
    assert!(has_changed(&markers(&[1, 2, 3]), &markers(&[1, 5, 3])));
    assert!(!has_changed(&markers(&[1, 2, 3]), &markers(&[1, 2, 3])));
  }

  #[test]
  fn severity_flip_is_not_a_change() {
    let previous = markers(&[10]);
    let diagnostic = Arc::new(Diagnostic::warning(0, 0, "now a warning"));
    let current = vec![Marker {
      severity: diagnostic.severity,
      diagnostic,
      y: 10,
    }];
    assert!(!has_changed(&previous, &current));
  }

  quickcheck::quickcheck! {
    fn differing_lengths_always_change(a: Vec<u32>, b: Vec<u32>) -> bool {
      a.len() == b.len() || has_changed(&markers(&a), &markers(&b))
    }
  }
}
