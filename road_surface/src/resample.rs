use crate::{cubic::interpolate, Grid, GridLayout};

/// Lateral region of the dense grid.  Each zone maps dense columns back onto the source grid
/// differently and uses its own pair of tangent step lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LateralZone {
  LeftShoulder,
  LeftTrack,
  InnerLane,
  RightTrack,
  RightShoulder,
}

impl LateralZone {
  pub fn classify(layout: &GridLayout, j: usize) -> Self {
    if j < layout.l_track {
      LateralZone::LeftShoulder
    } else if j == layout.l_track {
      LateralZone::LeftTrack
    } else if j < layout.r_track {
      LateralZone::InnerLane
    } else if j == layout.r_track {
      LateralZone::RightTrack
    } else {
      LateralZone::RightShoulder
    }
  }

  pub fn steps(self, layout: &GridLayout) -> (f32, f32) {
    let small = layout.small_step();
    let large = layout.large_step();
    match self {
      LateralZone::LeftShoulder | LateralZone::RightShoulder => (small, small),
      LateralZone::LeftTrack => (small, large),
      LateralZone::InnerLane => (large, large),
      LateralZone::RightTrack => (large, small),
    }
  }
}

/// Where a dense row or column lands in the source grid.  The cubic stencil covers source indices
/// `source - 1 ..= source + 2` and is evaluated at `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilPos {
  pub source: usize,
  pub t: f32,
  pub steps: (f32, f32),
}

/// Maps an index on a uniformly subdivided axis to `(source index, fractional offset)`.
#[inline(always)]
fn subdivide(ix: usize, lsd: usize) -> (usize, f32) {
  let sub = (ix - 1) % lsd;
  (1 + (ix - 1 - sub) / lsd, sub as f32 / lsd as f32)
}

pub fn longitudinal_stencil(layout: &GridLayout, i: usize) -> StencilPos {
  let (source, t) = subdivide(i, layout.length_subdivisions);
  StencilPos {
    source,
    t,
    steps: (layout.small_step(), layout.small_step()),
  }
}

pub fn lateral_stencil(layout: &GridLayout, j: usize) -> StencilPos {
  let zone = LateralZone::classify(layout, j);
  let steps = zone.steps(layout);

  match zone {
    LateralZone::LeftShoulder | LateralZone::LeftTrack => {
      let (source, t) = subdivide(j, layout.length_subdivisions);
      StencilPos { source, t, steps }
    }
    LateralZone::InnerLane => StencilPos {
      source: layout.l_track_in,
      t: (j + layout.inner_m - layout.r_track) as f32 / layout.inner_m as f32,
      steps,
    },
    LateralZone::RightTrack | LateralZone::RightShoulder => {
      let (source, t) = subdivide(j, layout.length_subdivisions);
      // skip over the inner lane samples that the source grid doesn't store
      StencilPos {
        source: source - (layout.in_inner_m - 2),
        t,
        steps,
      }
    }
  }
}

fn sample(source: &Grid<f32>, row: StencilPos, col: StencilPos) -> f32 {
  let mut across = [0.; 4];
  for (k, val) in across.iter_mut().enumerate() {
    let src_col = col.source - 1 + k;
    let along = [
      source[(row.source - 1, src_col)],
      source[(row.source, src_col)],
      source[(row.source + 1, src_col)],
      source[(row.source + 2, src_col)],
    ];
    *val = interpolate(along, row.steps, row.t);
  }

  interpolate(across, col.steps, col.t)
}

/// Evaluates the dense `(n + 3) x (m + 3)` elevation grid from the source grid.
pub fn resample(source: &Grid<f32>, layout: &GridLayout) -> Grid<f32> {
  let mut dense = Grid::new(layout.n + 3, layout.m + 3);

  let cols: Vec<StencilPos> = (1..=layout.m)
    .map(|j| lateral_stencil(layout, j))
    .collect();

  for i in 1..=layout.n {
    let row = longitudinal_stencil(layout, i);
    for (col_ix, &col) in cols.iter().enumerate() {
      dense[(i, col_ix + 1)] = sample(source, row, col);
    }
  }

  dense
}
