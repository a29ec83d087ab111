use std::fmt::{Debug, Display};

/// Everything that can stop a road surface from being generated.  All of these
/// are detected up front, before any grid is allocated.
#[derive(Clone, PartialEq)]
pub enum GenerateError {
  TrackLengthMismatch { left: usize, right: usize },
  TooFewSamples { len: usize },
  LaneNotWiderThanTrack { lane_width: f32, track_width: f32 },
  InvalidSampleDistance(f32),
  InvalidLengthSubdivisions(usize),
  InvalidRoughness(f32),
  InvalidSegmentLength(f32),
  /// The track width rounds to zero grid cells at the configured sample distance.
  TrackTooNarrow { track_width: f32, sample_distance: f32 },
  /// The shoulder outside each wheel track rounds to zero grid cells.
  LaneTooNarrow { lane_width: f32, track_width: f32, sample_distance: f32 },
  UnsupportedOption { name: &'static str, value: f32 },
  IndexOverflow { vertex_count: usize, max: usize },
  /// Some grid dimension doesn't fit in a `usize`.
  GridTooLarge { samples: usize, length_subdivisions: usize },
  InvalidParams(String),
}

impl Display for GenerateError {
  #[cold]
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      GenerateError::TrackLengthMismatch { left, right } => write!(
        f,
        "left and right tracks must have the same number of samples; found {left} and {right}"
      ),
      GenerateError::TooFewSamples { len } => write!(
        f,
        "tracks must have at least 2 samples to build a surface; found {len}"
      ),
      GenerateError::LaneNotWiderThanTrack {
        lane_width,
        track_width,
      } => write!(
        f,
        "lane width ({lane_width}) must be greater than track width ({track_width})"
      ),
      GenerateError::InvalidSampleDistance(ds) => write!(
        f,
        "sample distance must be a finite value greater than zero; found {ds}"
      ),
      GenerateError::InvalidLengthSubdivisions(lsd) => {
        write!(f, "length subdivisions must be at least 1; found {lsd}")
      }
      GenerateError::InvalidRoughness(roughness) => write!(
        f,
        "roughness must be a finite, non-negative value; found {roughness}"
      ),
      GenerateError::InvalidSegmentLength(len) => write!(
        f,
        "segment length must be a finite value of at least one sample distance; found {len}"
      ),
      GenerateError::TrackTooNarrow {
        track_width,
        sample_distance,
      } => write!(
        f,
        "track width ({track_width}) rounds to zero cells at sample distance {sample_distance}"
      ),
      GenerateError::LaneTooNarrow {
        lane_width,
        track_width,
        sample_distance,
      } => write!(
        f,
        "lane width ({lane_width}) leaves no shoulder outside track width ({track_width}) at \
         sample distance {sample_distance}"
      ),
      GenerateError::UnsupportedOption { name, value } => write!(
        f,
        "`{name}` is accepted for compatibility but has no effect on the generated surface; it \
         must be 0, found {value}"
      ),
      GenerateError::IndexOverflow { vertex_count, max } => write!(
        f,
        "surface would have {vertex_count} vertices but the index buffer can only address {max}; \
         use 32-bit indices or reduce the resolution"
      ),
      GenerateError::GridTooLarge {
        samples,
        length_subdivisions,
      } => write!(
        f,
        "grid for {samples} samples with {length_subdivisions} length subdivisions is too large \
         to address; reduce the resolution or the lane width"
      ),
      GenerateError::InvalidParams(msg) => write!(f, "invalid road surface params: {msg}"),
    }
  }
}

impl Debug for GenerateError {
  #[cold]
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{self}")
  }
}

impl std::error::Error for GenerateError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages_name_the_offending_values() {
    let err = GenerateError::TrackLengthMismatch { left: 5, right: 4 };
    let msg = err.to_string();
    assert!(msg.contains('5') && msg.contains('4'));

    let err = GenerateError::UnsupportedOption {
      name: "roadBankingAngle",
      value: 2.,
    };
    assert!(format!("{err:?}").contains("roadBankingAngle"));
  }
}
