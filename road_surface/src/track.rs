use crate::GenerateError;

/// Elevation samples (meters) taken at a uniform spacing along one wheel path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackProfile {
  samples: Vec<f32>,
}

impl TrackProfile {
  pub fn new(samples: Vec<f32>) -> Self {
    TrackProfile { samples }
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn samples(&self) -> &[f32] {
    &self.samples
  }
}

impl From<Vec<f32>> for TrackProfile {
  fn from(samples: Vec<f32>) -> Self {
    TrackProfile::new(samples)
  }
}

impl From<&[f32]> for TrackProfile {
  fn from(samples: &[f32]) -> Self {
    TrackProfile::new(samples.to_owned())
  }
}

/// Left and right wheel tracks, guaranteed to have the same number of samples (at least 2).
#[derive(Clone, Debug, PartialEq)]
pub struct TrackPair {
  left: TrackProfile,
  right: TrackProfile,
}

impl TrackPair {
  pub fn new(
    left: impl Into<TrackProfile>,
    right: impl Into<TrackProfile>,
  ) -> Result<Self, GenerateError> {
    let left = left.into();
    let right = right.into();
    if left.len() != right.len() {
      return Err(GenerateError::TrackLengthMismatch {
        left: left.len(),
        right: right.len(),
      });
    }
    if left.len() < 2 {
      return Err(GenerateError::TooFewSamples { len: left.len() });
    }

    Ok(TrackPair { left, right })
  }

  pub fn left(&self) -> &TrackProfile {
    &self.left
  }

  pub fn right(&self) -> &TrackProfile {
    &self.right
  }

  /// Number of samples in each track (`inN`).
  pub fn len(&self) -> usize {
    self.left.len()
  }

  /// Splits the pair into consecutive windows of `intervals` sample spacings each.  Neighboring
  /// windows share their boundary sample so the resulting surfaces line up.  The final window may
  /// be shorter but always has at least 2 samples.
  ///
  /// Yields `(first_sample_ix, window)`.
  pub fn windows(&self, intervals: usize) -> impl Iterator<Item = (usize, TrackPair)> + '_ {
    let intervals = intervals.max(1);
    let len = self.len();
    (0..len - 1).step_by(intervals).map(move |start| {
      let end = start.saturating_add(intervals).min(len - 1);
      let window = TrackPair {
        left: TrackProfile::from(&self.left.samples[start..=end]),
        right: TrackProfile::from(&self.right.samples[start..=end]),
      };
      (start, window)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_length_mismatch() {
    let err = TrackPair::new(vec![0.; 5], vec![0.; 4]).unwrap_err();
    assert_eq!(err, GenerateError::TrackLengthMismatch { left: 5, right: 4 });
  }

  #[test]
  fn test_too_few_samples() {
    assert_eq!(
      TrackPair::new(vec![1.], vec![1.]).unwrap_err(),
      GenerateError::TooFewSamples { len: 1 }
    );
    assert_eq!(
      TrackPair::new(Vec::new(), Vec::new()).unwrap_err(),
      GenerateError::TooFewSamples { len: 0 }
    );
  }

  #[test]
  fn test_windows_share_boundary_samples() {
    let left: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let right: Vec<f32> = (0..10).map(|i| -(i as f32)).collect();
    let tracks = TrackPair::new(left, right).unwrap();

    let windows: Vec<_> = tracks.windows(4).collect();
    assert_eq!(windows.len(), 3);

    assert_eq!(windows[0].0, 0);
    assert_eq!(windows[0].1.left().samples(), &[0., 1., 2., 3., 4.]);
    assert_eq!(windows[1].0, 4);
    assert_eq!(windows[1].1.left().samples(), &[4., 5., 6., 7., 8.]);
    assert_eq!(windows[2].0, 8);
    assert_eq!(windows[2].1.left().samples(), &[8., 9.]);
    assert_eq!(windows[2].1.right().samples(), &[-8., -9.]);
  }

  #[test]
  fn test_single_window_when_segment_covers_track() {
    let tracks = TrackPair::new(vec![0.; 5], vec![0.; 5]).unwrap();
    let windows: Vec<_> = tracks.windows(100).collect();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].1, tracks);

    let windows: Vec<_> = tracks.windows(usize::MAX).collect();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].1, tracks);
  }
}
