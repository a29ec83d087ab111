use log::debug;

use crate::{GenerateError, GeometryConfig};

/// All of the grid dimensions and zone boundaries derived from a validated config.
///
/// Indices follow the padded grids: real source data lives in rows `1..=in_n` and columns
/// `1..=in_m`, real dense data in rows `1..=n` and columns `1..=m`.  Row/column 0 and the last two
/// rows/columns of each grid are stencil padding.
///
/// The source grid only stores the road outside the wheel tracks.  The inner lane between
/// `l_track_in` and `r_track_in` is collapsed so those two columns are adjacent; the `in_inner_m - 2`
/// samples that would sit between them in a uniformly sampled grid are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
  pub sample_distance: f32,
  pub length_subdivisions: usize,
  /// Snapped distance between the wheel tracks.
  pub track_width: f32,
  /// Snapped total road width.
  pub lane_width: f32,

  pub in_n: usize,
  pub in_m: usize,
  pub l_track_in: usize,
  pub r_track_in: usize,
  /// Number of `sample_distance` spaced samples across the inner lane, both tracks included.
  pub in_inner_m: usize,

  pub n: usize,
  /// Dense columns outside the wheel tracks, summed over both sides.
  pub outer_m: usize,
  /// Dense columns spanned by the inner lane.
  pub inner_m: usize,
  pub m: usize,
  /// Dense column holding the left wheel track.
  pub l_track: usize,
  /// Dense column holding the right wheel track.
  pub r_track: usize,
}

impl GridLayout {
  /// `config` must already have passed `GeometryConfig::validate`.  Fails if any grid, including
  /// stencil padding and the final index buffer, would be too large to address.
  pub fn new(config: &GeometryConfig, in_n: usize) -> Result<Self, GenerateError> {
    let layout = Self::derive(config, in_n).ok_or(GenerateError::GridTooLarge {
      samples: in_n,
      length_subdivisions: config.length_subdivisions,
    })?;
    debug!(
      "road surface layout: source {}x{}, dense {}x{}, tracks at dense columns {} and {}",
      layout.in_n, layout.in_m, layout.n, layout.m, layout.l_track, layout.r_track
    );
    Ok(layout)
  }

  fn derive(config: &GeometryConfig, in_n: usize) -> Option<Self> {
    let ds = config.sample_distance;
    let lsd = config.length_subdivisions;
    let track_cells = config.track_cells();
    let margin_cells = config.margin_cells();

    let in_m = margin_cells.checked_mul(2)?.checked_add(2)?;
    let l_track_in = margin_cells.checked_add(1)?;
    let outer_m = margin_cells.checked_mul(2)?.checked_mul(lsd)?;
    let inner_m = track_cells.checked_mul(lsd)?.checked_add(1)?;
    let m = outer_m.checked_add(inner_m)?;
    let n = in_n.checked_sub(1)?.checked_mul(lsd)?.checked_add(1)?;

    // padded source and dense grids, vertex buffers and the index buffer
    in_n.checked_add(3)?.checked_mul(in_m.checked_add(3)?)?;
    n.checked_add(3)?.checked_mul(m.checked_add(3)?)?;
    n.checked_mul(m)?.checked_mul(3)?;
    (n - 1).checked_mul(m - 1)?.checked_mul(6)?;

    Some(GridLayout {
      sample_distance: ds,
      length_subdivisions: lsd,
      track_width: track_cells as f32 * ds,
      lane_width: (track_cells as f32 + 2. * margin_cells as f32) * ds,
      in_n,
      in_m,
      l_track_in,
      r_track_in: l_track_in.checked_add(1)?,
      in_inner_m: track_cells.checked_add(1)?,
      n,
      outer_m,
      inner_m,
      m,
      l_track: outer_m / 2 + 1,
      r_track: m - outer_m / 2,
    })
  }

  /// Spacing between dense grid vertices, both along and across the road.
  pub fn output_sample_distance(&self) -> f32 {
    self.sample_distance / self.length_subdivisions as f32
  }

  /// Derivative step used wherever the stencil stays on uniformly sampled columns.
  pub fn small_step(&self) -> f32 {
    2.
  }

  /// Derivative step used wherever the stencil spans the collapsed inner lane.
  pub fn large_step(&self) -> f32 {
    (self.in_inner_m + 1) as f32
  }

  pub fn vertex_count(&self) -> usize {
    self.n * self.m
  }

  pub fn triangle_count(&self) -> usize {
    2 * (self.n - 1) * (self.m - 1)
  }

  pub fn road_length(&self) -> f32 {
    (self.in_n - 1) as f32 * self.sample_distance
  }

  pub fn check_index_width(&self, max_vertices: usize) -> Result<(), GenerateError> {
    let vertex_count = self.vertex_count();
    if vertex_count > max_vertices {
      return Err(GenerateError::IndexOverflow {
        vertex_count,
        max: max_vertices,
      });
    }
    Ok(())
  }
}
