use log::{info, warn};
use rand::Rng;

pub mod camera;
pub mod config;
pub mod cubic;
pub mod error;
pub mod grid;
#[cfg(feature = "bindgen")]
pub mod interface;
pub mod layout;
pub mod resample;
pub mod source_grid;
pub mod track;
pub mod triangulate;

pub use self::{
  camera::{projection_matrix, OrbitCamera, OrbitControls},
  config::{BoundaryMode, GeometryConfig, IndexWidth, NormalMode, RoadParams},
  error::GenerateError,
  grid::Grid,
  layout::GridLayout,
  track::{TrackPair, TrackProfile},
  triangulate::{IndexBuffer, Mesh},
};

use self::{resample::resample, source_grid::build_source_grid, triangulate::triangulate};

/// Runs the full pipeline on tracks and a config that have already been checked.
fn generate_checked(
  config: &GeometryConfig,
  tracks: &TrackPair,
  layout: &GridLayout,
  rng: &mut impl Rng,
) -> Mesh {
  let source = build_source_grid(tracks, layout, config.boundary_mode);
  let dense = resample(&source, layout);
  triangulate(
    &dense,
    layout,
    config.roughness,
    config.normal_mode,
    config.index_width,
    rng,
  )
}

fn check_roughness(config: &GeometryConfig, layout: &GridLayout) {
  let max_jitter = config.roughness / layout.length_subdivisions as f32;
  if max_jitter > layout.output_sample_distance() {
    warn!(
      "road roughness of {} gives up to {max_jitter}m of jitter, more than the {}m vertex spacing",
      config.roughness,
      layout.output_sample_distance()
    );
  }
}

/// Builds a triangulated road surface from a pair of wheel track elevation profiles.
///
/// `left` and `right` are sampled every `config.sample_distance` meters along the road.  Every
/// input is checked before any grid is built; on success the returned mesh owns all of its
/// buffers.  `rng` drives the roughness jitter and is advanced once per vertex.
pub fn generate(
  config: &GeometryConfig,
  left: impl Into<TrackProfile>,
  right: impl Into<TrackProfile>,
  rng: &mut impl Rng,
) -> Result<Mesh, GenerateError> {
  let tracks = TrackPair::new(left, right)?;
  config.validate()?;
  let layout = GridLayout::new(config, tracks.len())?;
  layout.check_index_width(config.index_width.max_vertices())?;
  check_roughness(config, &layout);

  let mesh = generate_checked(config, &tracks, &layout, rng);
  info!(
    "generated road surface: {} vertices, {} triangles over {}m",
    mesh.vertex_count(),
    mesh.triangle_count(),
    mesh.road_length
  );
  Ok(mesh)
}

/// Like `generate`, but splits the tracks into consecutive meshes each covering about
/// `config.segment_length` meters of road.  Neighboring segments share their boundary samples.
pub fn generate_segments(
  config: &GeometryConfig,
  left: impl Into<TrackProfile>,
  right: impl Into<TrackProfile>,
  rng: &mut impl Rng,
) -> Result<Vec<Mesh>, GenerateError> {
  let tracks = TrackPair::new(left, right)?;
  config.validate()?;

  let segment_length = config.segment_length;
  if !segment_length.is_finite() || segment_length < config.sample_distance {
    return Err(GenerateError::InvalidSegmentLength(segment_length));
  }
  // a single segment never needs to cover more than the whole track pair
  let intervals = ((segment_length / config.sample_distance).round() as usize)
    .clamp(1, tracks.len() - 1);

  // the first window is always the longest one
  let largest = GridLayout::new(config, intervals + 1)?;
  largest.check_index_width(config.index_width.max_vertices())?;
  check_roughness(config, &largest);

  let meshes = tracks
    .windows(intervals)
    .map(|(start_ix, window)| {
      let layout = GridLayout::new(config, window.len())?;
      let mut mesh = generate_checked(config, &window, &layout, rng);
      mesh.start_distance = start_ix as f32 * config.sample_distance;
      Ok(mesh)
    })
    .collect::<Result<Vec<_>, GenerateError>>()?;

  info!(
    "generated {} road surface segments of up to {intervals} intervals each",
    meshes.len()
  );
  Ok(meshes)
}
