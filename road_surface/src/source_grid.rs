use crate::{BoundaryMode, Grid, GridLayout, TrackPair};

/// Builds the padded, laterally collapsed source grid that the resampler reads from.
///
/// Each track is written into two neighboring columns so that the surface has no lateral slope
/// right at the track.  Everything else is zero.
pub fn build_source_grid(
  tracks: &TrackPair,
  layout: &GridLayout,
  boundary_mode: BoundaryMode,
) -> Grid<f32> {
  let mut grid = Grid::new(layout.in_n + 3, layout.in_m + 3);

  let left = tracks.left().samples();
  let right = tracks.right().samples();
  for (sample_ix, (&l, &r)) in left.iter().zip(right).enumerate() {
    let row = sample_ix + 1;
    grid[(row, layout.l_track_in - 1)] = l;
    grid[(row, layout.l_track_in)] = l;
    grid[(row, layout.r_track_in)] = r;
    grid[(row, layout.r_track_in + 1)] = r;
  }

  if boundary_mode == BoundaryMode::Clamped {
    clamp_padding(&mut grid, layout.in_n, layout.in_m);
  }

  grid
}

fn clamp_padding(grid: &mut Grid<f32>, in_n: usize, in_m: usize) {
  grid.copy_col(1, 0);
  grid.copy_col(in_m, in_m + 1);
  grid.copy_col(in_m, in_m + 2);

  // rows go second so the corners pick up the clamped columns too
  grid.copy_row(1, 0);
  grid.copy_row(in_n, in_n + 1);
  grid.copy_row(in_n, in_n + 2);
}
