use common::random_signed;
use nalgebra::{Matrix4, Vector3};
use rand::Rng;

use crate::{Grid, GridLayout, IndexWidth, NormalMode};

#[derive(Clone, Debug, PartialEq)]
pub enum IndexBuffer {
  U16(Vec<u16>),
  U32(Vec<u32>),
}

impl IndexBuffer {
  fn with_capacity(width: IndexWidth, capacity: usize) -> Self {
    match width {
      IndexWidth::U16 => IndexBuffer::U16(Vec::with_capacity(capacity)),
      IndexWidth::U32 => IndexBuffer::U32(Vec::with_capacity(capacity)),
    }
  }

  /// Vertex counts are checked against the index width before triangulation starts, so these
  /// casts never truncate.
  fn push_triangle(&mut self, [a, b, c]: [usize; 3]) {
    match self {
      IndexBuffer::U16(indices) => indices.extend([a as u16, b as u16, c as u16]),
      IndexBuffer::U32(indices) => indices.extend([a as u32, b as u32, c as u32]),
    }
  }

  pub fn len(&self) -> usize {
    match self {
      IndexBuffer::U16(indices) => indices.len(),
      IndexBuffer::U32(indices) => indices.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn width(&self) -> IndexWidth {
    match self {
      IndexBuffer::U16(_) => IndexWidth::U16,
      IndexBuffer::U32(_) => IndexWidth::U32,
    }
  }

  pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
    match self {
      IndexBuffer::U16(indices) => Box::new(indices.iter().map(|&ix| ix as u32)),
      IndexBuffer::U32(indices) => Box::new(indices.iter().copied()),
    }
  }

  pub fn to_u32(&self) -> Vec<u32> {
    self.iter().collect()
  }
}

/// Triangulated road surface, ready to upload.
///
/// Vertices are laid out with the longitudinal index varying fastest: vertex `x + z * N` sits at
/// `x` samples along the road and `z` samples across it.  The surface spans `[0, road_length]`
/// along X and `[0, lane_width]` along Z; `model_matrix` centers it on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
  pub vertices: Vec<f32>,
  pub normals: Vec<f32>,
  pub indices: IndexBuffer,
  /// `N`
  pub length_vertices: usize,
  /// `M`
  pub width_vertices: usize,
  pub road_length: f32,
  pub lane_width: f32,
  /// Distance along the full track pair of this mesh's first sample row.  Non-zero only for
  /// segments after the first.
  pub start_distance: f32,
}

impl Mesh {
  pub fn vertex_count(&self) -> usize {
    self.vertices.len() / 3
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  #[inline]
  fn vtx_ix(&self, x: usize, z: usize) -> usize {
    x + z * self.length_vertices
  }

  pub fn position(&self, x: usize, z: usize) -> Vector3<f32> {
    let ix = self.vtx_ix(x, z) * 3;
    Vector3::new(
      self.vertices[ix],
      self.vertices[ix + 1],
      self.vertices[ix + 2],
    )
  }

  pub fn normal(&self, x: usize, z: usize) -> Vector3<f32> {
    let ix = self.vtx_ix(x, z) * 3;
    Vector3::new(self.normals[ix], self.normals[ix + 1], self.normals[ix + 2])
  }

  /// Translation that centers the road on the origin.
  pub fn placement_offset(&self) -> Vector3<f32> {
    Vector3::new(-self.road_length / 2., 0., -self.lane_width / 2.)
  }

  pub fn model_matrix(&self) -> Matrix4<f32> {
    Matrix4::new_translation(&self.placement_offset())
  }
}

fn write_vec3(buf: &mut [f32], vtx_ix: usize, v: &Vector3<f32>) {
  buf[vtx_ix * 3] = v.x;
  buf[vtx_ix * 3 + 1] = v.y;
  buf[vtx_ix * 3 + 2] = v.z;
}

fn compute_positions(
  dense: &Grid<f32>,
  layout: &GridLayout,
  roughness: f32,
  rng: &mut impl Rng,
) -> Vec<Vector3<f32>> {
  let (n, m) = (layout.n, layout.m);
  let ds_out = layout.output_sample_distance();
  let jitter_scale = roughness / layout.length_subdivisions as f32;

  let mut positions = Vec::with_capacity(n * m);
  for z in 0..m {
    for x in 0..n {
      let jitter = jitter_scale * random_signed(rng);
      positions.push(Vector3::new(
        x as f32 * ds_out,
        dense[(x + 1, z + 1)] + jitter,
        z as f32 * ds_out,
      ));
    }
  }
  positions
}

/// Visits each quad as `(a, b, c, d)` vertex indices where `a = (x, z)`, `b = (x, z + 1)`,
/// `c = (x + 1, z)` and `d = (x + 1, z + 1)`.  The quad is split into triangles `a, b, c` and
/// `c, b, d`.
fn for_each_quad(n: usize, m: usize, mut cb: impl FnMut([usize; 4])) {
  for x in 0..n - 1 {
    for z in 0..m - 1 {
      let a = x + z * n;
      let b = x + (z + 1) * n;
      let c = (x + 1) + z * n;
      let d = (x + 1) + (z + 1) * n;
      cb([a, b, c, d]);
    }
  }
}

fn face_normals(positions: &[Vector3<f32>], [a, b, c, d]: [usize; 4]) -> [Vector3<f32>; 2] {
  let (pa, pb, pc, pd) = (positions[a], positions[b], positions[c], positions[d]);
  [(pb - pa).cross(&(pc - pa)), (pb - pc).cross(&(pd - pc))]
}

fn compute_normals(positions: &[Vector3<f32>], layout: &GridLayout, mode: NormalMode) -> Vec<f32> {
  let mut normals = vec![0.; positions.len() * 3];

  match mode {
    NormalMode::PerQuad => {
      for_each_quad(layout.n, layout.m, |quad @ [a, b, c, d]| {
        let [normal1, normal2] = face_normals(positions, quad);
        let shared = 0.5 * (normal1 + normal2);
        write_vec3(&mut normals, a, &normal1);
        write_vec3(&mut normals, b, &shared);
        write_vec3(&mut normals, c, &shared);
        write_vec3(&mut normals, d, &normal2);
      });
    }
    NormalMode::Accumulated => {
      let mut acc = vec![Vector3::zeros(); positions.len()];
      for_each_quad(layout.n, layout.m, |quad @ [a, b, c, d]| {
        let [normal1, normal2] = face_normals(positions, quad);
        acc[a] += normal1;
        acc[b] += normal1 + normal2;
        acc[c] += normal1 + normal2;
        acc[d] += normal2;
      });
      for (vtx_ix, normal) in acc.iter().enumerate() {
        let normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::y);
        write_vec3(&mut normals, vtx_ix, &normal);
      }
    }
  }

  normals
}

/// Turns the dense elevation grid into vertex, normal and index buffers.
///
/// Every vertex draws exactly one sample from `rng`, even when `roughness` is zero, so the RNG
/// ends up in the same state regardless of the jitter amplitude.
pub fn triangulate(
  dense: &Grid<f32>,
  layout: &GridLayout,
  roughness: f32,
  normal_mode: NormalMode,
  index_width: IndexWidth,
  rng: &mut impl Rng,
) -> Mesh {
  let positions = compute_positions(dense, layout, roughness, rng);
  let normals = compute_normals(&positions, layout, normal_mode);

  let mut indices = IndexBuffer::with_capacity(index_width, layout.triangle_count() * 3);
  for_each_quad(layout.n, layout.m, |[a, b, c, d]| {
    indices.push_triangle([a, b, c]);
    indices.push_triangle([c, b, d]);
  });

  let mut vertices = Vec::with_capacity(positions.len() * 3);
  for pos in &positions {
    vertices.extend([pos.x, pos.y, pos.z]);
  }

  Mesh {
    vertices,
    normals,
    indices,
    length_vertices: layout.n,
    width_vertices: layout.m,
    road_length: layout.road_length(),
    lane_width: layout.lane_width,
    start_distance: 0.,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::GeometryConfig;
  use common::build_rng;

  fn flat_setup(lsd: usize) -> (Grid<f32>, GridLayout) {
    let config = GeometryConfig {
      sample_distance: 0.5,
      length_subdivisions: lsd,
      ..Default::default()
    };
    let layout = GridLayout::new(&config, 4).unwrap();
    let dense = Grid::new(layout.n + 3, layout.m + 3);
    (dense, layout)
  }

  #[test]
  fn test_buffer_sizes_and_index_bounds() {
    let (dense, layout) = flat_setup(2);
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::PerQuad,
      IndexWidth::U16,
      &mut build_rng(0),
    );

    let (n, m) = (layout.n, layout.m);
    assert_eq!(mesh.vertices.len(), n * m * 3);
    assert_eq!(mesh.normals.len(), n * m * 3);
    assert_eq!(mesh.indices.len(), 6 * (n - 1) * (m - 1));
    assert_eq!(mesh.triangle_count(), 2 * (n - 1) * (m - 1));
    assert!(mesh.indices.iter().all(|ix| (ix as usize) < n * m));
    assert_eq!(mesh.indices.width(), IndexWidth::U16);
  }

  #[test]
  fn test_first_quad_indices() {
    let (dense, layout) = flat_setup(1);
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::PerQuad,
      IndexWidth::U32,
      &mut build_rng(0),
    );
    let n = layout.n as u32;
    let indices = mesh.indices.to_u32();
    assert_eq!(&indices[..6], &[0, n, 1, 1, n, n + 1]);
    // the second quad steps across the road
    assert_eq!(&indices[6..12], &[n, 2 * n, n + 1, n + 1, 2 * n, 2 * n + 1]);
  }

  #[test]
  fn test_vertex_positions() {
    let (mut dense, layout) = flat_setup(2);
    dense[(3, 5)] = 0.75;
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::PerQuad,
      IndexWidth::U16,
      &mut build_rng(0),
    );
    let pos = mesh.position(2, 4);
    assert_eq!(pos, Vector3::new(0.5, 0.75, 1.));
    assert_eq!(mesh.position(0, 0), Vector3::zeros());
  }

  #[test]
  fn test_flat_normals_point_up() {
    let (dense, layout) = flat_setup(1);
    let ds_out = layout.output_sample_distance();
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::PerQuad,
      IndexWidth::U16,
      &mut build_rng(0),
    );
    // per-quad normals stay unnormalized; on a flat grid they're the quad area
    for z in 0..layout.m {
      for x in 0..layout.n {
        let normal = mesh.normal(x, z);
        assert!((normal - Vector3::new(0., ds_out * ds_out, 0.)).norm() < 1e-6);
      }
    }
  }

  #[test]
  fn test_per_quad_normals_are_overwritten_by_later_quads() {
    let (mut dense, layout) = flat_setup(1);
    // raise a single interior vertex so the quads around it disagree
    dense[(3, 4)] = 1.;
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::PerQuad,
      IndexWidth::U16,
      &mut build_rng(0),
    );

    let positions: Vec<Vector3<f32>> = (0..mesh.vertex_count())
      .map(|ix| mesh.position(ix % layout.n, ix / layout.n))
      .collect();
    // vertex (2, 3) is corner `a` of quad (2, 3), the last quad visited that touches it
    let quad = [
      2 + 3 * layout.n,
      2 + 4 * layout.n,
      3 + 3 * layout.n,
      3 + 4 * layout.n,
    ];
    let [normal1, _] = face_normals(&positions, quad);
    assert_eq!(mesh.normal(2, 3), normal1);

    // vertex (3, 3) is last written as corner `c` of quad (2, 3)
    let [normal1, normal2] = face_normals(&positions, quad);
    assert_eq!(mesh.normal(3, 3), 0.5 * (normal1 + normal2));
  }

  #[test]
  fn test_accumulated_normals_are_unit_length() {
    let (mut dense, layout) = flat_setup(2);
    dense[(3, 4)] = 1.;
    dense[(4, 8)] = -0.5;
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::Accumulated,
      IndexWidth::U16,
      &mut build_rng(0),
    );
    for z in 0..layout.m {
      for x in 0..layout.n {
        let normal = mesh.normal(x, z);
        assert!((normal.norm() - 1.).abs() < 1e-5);
        assert!(normal.y > 0.);
      }
    }
    // far from the bumps the surface is flat
    assert!((mesh.normal(layout.n - 1, layout.m - 1) - Vector3::y()).norm() < 1e-6);
  }

  #[test]
  fn test_jitter_is_bounded_and_seeded() {
    let (dense, layout) = flat_setup(2);
    let roughness = 0.1;
    let gen = |seed| {
      triangulate(
        &dense,
        &layout,
        roughness,
        NormalMode::PerQuad,
        IndexWidth::U16,
        &mut build_rng(seed),
      )
    };
    let mesh = gen(3);
    let max_jitter = roughness / layout.length_subdivisions as f32;
    let heights: Vec<f32> = mesh.vertices.chunks(3).map(|v| v[1]).collect();
    assert!(heights.iter().all(|h| h.abs() <= max_jitter));
    assert!(heights.iter().any(|&h| h != 0.));

    assert_eq!(gen(3).vertices, mesh.vertices);
    assert_ne!(gen(4).vertices, mesh.vertices);
  }

  #[test]
  fn test_placement() {
    let (dense, layout) = flat_setup(1);
    let mesh = triangulate(
      &dense,
      &layout,
      0.,
      NormalMode::PerQuad,
      IndexWidth::U16,
      &mut build_rng(0),
    );
    assert_eq!(mesh.road_length, 1.5);
    assert_eq!(mesh.lane_width, 3.5);
    assert_eq!(mesh.placement_offset(), Vector3::new(-0.75, 0., -1.75));

    let far_corner = mesh.position(layout.n - 1, layout.m - 1);
    assert_eq!(far_corner, Vector3::new(1.5, 0., 3.5));
    let centered = mesh.model_matrix().transform_point(&far_corner.into());
    assert!((centered.coords - Vector3::new(0.75, 0., 1.75)).norm() < 1e-6);
  }
}
