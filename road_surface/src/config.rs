use nanoserde::DeJson;

use crate::GenerateError;

/// How the one-cell padding around the source grid is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryMode {
  /// Padding stays zero, so the first/last longitudinal samples and the outer lateral edges blend
  /// toward zero.
  #[default]
  ZeroPadded,
  /// Padding repeats the nearest real row/column, removing the edge flattening.
  Clamped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalMode {
  /// Each quad writes its two face normals straight into its four corners, overwriting whatever
  /// earlier quads wrote there.  Shared corners get the mean of the quad's two faces.
  #[default]
  PerQuad,
  /// Every vertex sums the face normals of all triangles touching it, then normalizes once.
  Accumulated,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexWidth {
  #[default]
  U16,
  U32,
}

impl IndexWidth {
  /// Max number of vertices addressable by an index buffer of this width.  Capped at
  /// `usize::MAX` on 32-bit targets.
  pub fn max_vertices(self) -> usize {
    match self {
      IndexWidth::U16 => u16::MAX as usize + 1,
      IndexWidth::U32 => (u32::MAX as usize).saturating_add(1),
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeometryConfig {
  /// Distance between consecutive track samples (`Ds`), in meters.
  pub sample_distance: f32,
  /// Lateral distance between the two wheel tracks.  Snapped to a multiple of `sample_distance`.
  pub track_width: f32,
  /// Total lateral extent of the road.  Snapped so that the shoulder on each side is a whole
  /// number of `sample_distance` cells.
  pub lane_width: f32,
  /// Upsampling factor applied along the road.
  pub length_subdivisions: usize,
  /// Amplitude of the per-vertex random height jitter.
  pub roughness: f32,
  /// Length of road covered by each mesh produced by `generate_segments`.
  pub segment_length: f32,
  /// Must be 0; banking is not applied to the surface.
  pub road_banking_angle: f32,
  /// Must be 0; grade is not applied to the surface.
  pub road_grade_angle: f32,
  pub boundary_mode: BoundaryMode,
  pub normal_mode: NormalMode,
  pub index_width: IndexWidth,
}

impl Default for GeometryConfig {
  fn default() -> Self {
    GeometryConfig {
      sample_distance: 0.1,
      track_width: 1.55,
      lane_width: 3.5,
      length_subdivisions: 1,
      roughness: 0.,
      segment_length: 15.,
      road_banking_angle: 0.,
      road_grade_angle: 0.,
      boundary_mode: BoundaryMode::default(),
      normal_mode: NormalMode::default(),
      index_width: IndexWidth::default(),
    }
  }
}

impl GeometryConfig {
  pub fn validate(&self) -> Result<(), GenerateError> {
    let ds = self.sample_distance;
    if !ds.is_finite() || ds <= 0. {
      return Err(GenerateError::InvalidSampleDistance(ds));
    }
    if self.length_subdivisions < 1 {
      return Err(GenerateError::InvalidLengthSubdivisions(
        self.length_subdivisions,
      ));
    }
    if !self.roughness.is_finite() || self.roughness < 0. {
      return Err(GenerateError::InvalidRoughness(self.roughness));
    }
    if !self.track_width.is_finite() || !self.lane_width.is_finite() {
      return Err(GenerateError::InvalidParams(format!(
        "track width and lane width must be finite; found {} and {}",
        self.track_width, self.lane_width
      )));
    }
    if self.lane_width <= self.track_width {
      return Err(GenerateError::LaneNotWiderThanTrack {
        lane_width: self.lane_width,
        track_width: self.track_width,
      });
    }
    if self.road_banking_angle != 0. {
      return Err(GenerateError::UnsupportedOption {
        name: "roadBankingAngle",
        value: self.road_banking_angle,
      });
    }
    if self.road_grade_angle != 0. {
      return Err(GenerateError::UnsupportedOption {
        name: "roadGradeAngle",
        value: self.road_grade_angle,
      });
    }

    if self.track_cells() == 0 {
      return Err(GenerateError::TrackTooNarrow {
        track_width: self.track_width,
        sample_distance: ds,
      });
    }
    if self.margin_cells() == 0 {
      return Err(GenerateError::LaneTooNarrow {
        lane_width: self.lane_width,
        track_width: self.track_width,
        sample_distance: ds,
      });
    }

    Ok(())
  }

  /// Number of `sample_distance` cells between the two wheel tracks.
  pub(crate) fn track_cells(&self) -> usize {
    let cells = (self.track_width / self.sample_distance).round();
    if cells < 1. {
      0
    } else {
      cells as usize
    }
  }

  /// Number of `sample_distance` cells between each wheel track and the edge of the road.
  pub(crate) fn margin_cells(&self) -> usize {
    let snapped_track_width = self.track_cells() as f32 * self.sample_distance;
    let cells = ((self.lane_width - snapped_track_width) / (2. * self.sample_distance)).round();
    if cells < 1. {
      0
    } else {
      cells as usize
    }
  }

  /// Parses params in the JSON shape used by the browser viewer.  Missing keys fall back to
  /// `GeometryConfig::default()`.
  pub fn from_json(json: &str) -> Result<Self, GenerateError> {
    let params = RoadParams::deserialize_json(json)
      .map_err(|err| GenerateError::InvalidParams(format!("{err:?}")))?;
    params.build()
  }
}

#[derive(DeJson, Default)]
pub struct RoadParams {
  #[nserde(default)]
  #[nserde(rename = "sampleDistance")]
  pub sample_distance: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "trackWidth")]
  pub track_width: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "laneWidth")]
  pub lane_width: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "segmentLength")]
  pub segment_length: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "meshResolutionScale")]
  pub mesh_resolution_scale: Option<usize>,
  #[nserde(default)]
  #[nserde(rename = "roadBankingAngle")]
  pub road_banking_angle: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "roadGradeAngle")]
  pub road_grade_angle: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "roadRoughness")]
  pub road_roughness: Option<f32>,
  #[nserde(default)]
  #[nserde(rename = "boundaryMode")]
  pub boundary_mode: Option<String>,
  #[nserde(default)]
  #[nserde(rename = "normalMode")]
  pub normal_mode: Option<String>,
  #[nserde(default)]
  #[nserde(rename = "indexWidth")]
  pub index_width: Option<u32>,
}

impl RoadParams {
  pub fn build(&self) -> Result<GeometryConfig, GenerateError> {
    let defaults = GeometryConfig::default();

    let boundary_mode = match self.boundary_mode.as_deref() {
      None => defaults.boundary_mode,
      Some("zeroPadded") => BoundaryMode::ZeroPadded,
      Some("clamped") => BoundaryMode::Clamped,
      Some(other) => {
        return Err(GenerateError::InvalidParams(format!(
          "unknown boundaryMode \"{other}\"; expected \"zeroPadded\" or \"clamped\""
        )))
      }
    };
    let normal_mode = match self.normal_mode.as_deref() {
      None => defaults.normal_mode,
      Some("perQuad") => NormalMode::PerQuad,
      Some("accumulated") => NormalMode::Accumulated,
      Some(other) => {
        return Err(GenerateError::InvalidParams(format!(
          "unknown normalMode \"{other}\"; expected \"perQuad\" or \"accumulated\""
        )))
      }
    };
    let index_width = match self.index_width {
      None => defaults.index_width,
      Some(16) => IndexWidth::U16,
      Some(32) => IndexWidth::U32,
      Some(other) => {
        return Err(GenerateError::InvalidParams(format!(
          "unsupported indexWidth {other}; expected 16 or 32"
        )))
      }
    };

    Ok(GeometryConfig {
      sample_distance: self.sample_distance.unwrap_or(defaults.sample_distance),
      track_width: self.track_width.unwrap_or(defaults.track_width),
      lane_width: self.lane_width.unwrap_or(defaults.lane_width),
      length_subdivisions: self
        .mesh_resolution_scale
        .unwrap_or(defaults.length_subdivisions),
      roughness: self.road_roughness.unwrap_or(defaults.roughness),
      segment_length: self.segment_length.unwrap_or(defaults.segment_length),
      road_banking_angle: self
        .road_banking_angle
        .unwrap_or(defaults.road_banking_angle),
      road_grade_angle: self.road_grade_angle.unwrap_or(defaults.road_grade_angle),
      boundary_mode,
      normal_mode,
      index_width,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_are_valid() {
    let config = GeometryConfig::default();
    config.validate().unwrap();
    assert_eq!(config.length_subdivisions, 1);
    assert_eq!(config.normal_mode, NormalMode::PerQuad);
    assert_eq!(config.boundary_mode, BoundaryMode::ZeroPadded);
    assert_eq!(config.index_width, IndexWidth::U16);
  }

  #[test]
  fn test_index_width_covers_every_index_value() {
    assert_eq!(IndexWidth::U16.max_vertices(), 1 << 16);
    #[cfg(target_pointer_width = "64")]
    assert_eq!(IndexWidth::U32.max_vertices(), 1 << 32);
    #[cfg(target_pointer_width = "32")]
    assert_eq!(IndexWidth::U32.max_vertices(), usize::MAX);
  }

  #[test]
  fn test_lane_must_be_wider_than_track() {
    let config = GeometryConfig {
      lane_width: 1.0,
      track_width: 1.55,
      ..Default::default()
    };
    assert_eq!(
      config.validate(),
      Err(GenerateError::LaneNotWiderThanTrack {
        lane_width: 1.0,
        track_width: 1.55
      })
    );

    let config = GeometryConfig {
      lane_width: 1.55,
      track_width: 1.55,
      ..Default::default()
    };
    assert!(matches!(
      config.validate(),
      Err(GenerateError::LaneNotWiderThanTrack { .. })
    ));
  }

  #[test]
  fn test_angles_are_rejected_when_set() {
    let config = GeometryConfig {
      road_banking_angle: 0.1,
      ..Default::default()
    };
    assert!(matches!(
      config.validate(),
      Err(GenerateError::UnsupportedOption {
        name: "roadBankingAngle",
        ..
      })
    ));

    let config = GeometryConfig {
      road_grade_angle: -0.1,
      ..Default::default()
    };
    assert!(matches!(
      config.validate(),
      Err(GenerateError::UnsupportedOption {
        name: "roadGradeAngle",
        ..
      })
    ));
  }

  #[test]
  fn test_rejects_degenerate_numbers() {
    let bad = [
      GeometryConfig {
        sample_distance: 0.,
        ..Default::default()
      },
      GeometryConfig {
        sample_distance: f32::NAN,
        ..Default::default()
      },
      GeometryConfig {
        length_subdivisions: 0,
        ..Default::default()
      },
      GeometryConfig {
        roughness: -1.,
        ..Default::default()
      },
      GeometryConfig {
        lane_width: f32::INFINITY,
        ..Default::default()
      },
    ];
    for config in bad {
      assert!(config.validate().is_err(), "{config:?} should be rejected");
    }
  }

  #[test]
  fn test_snapping_to_zero_cells_is_rejected() {
    let config = GeometryConfig {
      sample_distance: 1.,
      track_width: 0.4,
      lane_width: 3.,
      ..Default::default()
    };
    assert!(matches!(
      config.validate(),
      Err(GenerateError::TrackTooNarrow { .. })
    ));

    // 0.05m of shoulder per side rounds to zero 0.5m cells
    let config = GeometryConfig {
      sample_distance: 0.5,
      track_width: 1.5,
      lane_width: 1.6,
      ..Default::default()
    };
    assert!(matches!(
      config.validate(),
      Err(GenerateError::LaneTooNarrow { .. })
    ));
  }

  #[test]
  fn test_cell_counts() {
    let config = GeometryConfig {
      sample_distance: 0.5,
      track_width: 1.55,
      lane_width: 3.5,
      ..Default::default()
    };
    assert_eq!(config.track_cells(), 3);
    assert_eq!(config.margin_cells(), 2);
  }

  #[test]
  fn test_from_json_applies_defaults() {
    let config =
      GeometryConfig::from_json(r#"{"sampleDistance": 0.5, "meshResolutionScale": 4}"#).unwrap();
    assert_eq!(config.sample_distance, 0.5);
    assert_eq!(config.length_subdivisions, 4);
    assert_eq!(config.track_width, 1.55);
    assert_eq!(config.lane_width, 3.5);
    assert_eq!(config.segment_length, 15.);

    let config = GeometryConfig::from_json("{}").unwrap();
    assert_eq!(config, GeometryConfig::default());
  }

  #[test]
  fn test_from_json_modes() {
    let config = GeometryConfig::from_json(
      r#"{"boundaryMode": "clamped", "normalMode": "accumulated", "indexWidth": 32, "roadRoughness": 0.01}"#,
    )
    .unwrap();
    assert_eq!(config.boundary_mode, BoundaryMode::Clamped);
    assert_eq!(config.normal_mode, NormalMode::Accumulated);
    assert_eq!(config.index_width, IndexWidth::U32);
    assert_eq!(config.roughness, 0.01);
  }

  #[test]
  fn test_from_json_rejects_bad_input() {
    assert!(matches!(
      GeometryConfig::from_json(r#"{"normalMode": "smooth"}"#),
      Err(GenerateError::InvalidParams(_))
    ));
    assert!(matches!(
      GeometryConfig::from_json(r#"{"indexWidth": 8}"#),
      Err(GenerateError::InvalidParams(_))
    ));
    assert!(matches!(
      GeometryConfig::from_json("not json"),
      Err(GenerateError::InvalidParams(_))
    ));
  }
}
