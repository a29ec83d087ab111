use std::f32::consts::PI;

use common::clamp;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::Mesh;

pub const DEFAULT_FOV_Y_DEGREES: f32 = 45.;
pub const DEFAULT_NEAR: f32 = 0.001;
pub const DEFAULT_FAR: f32 = 10_000.;

const MIN_PHI: f32 = 0.01;
const MAX_PHI: f32 = PI - 0.01;
const MIN_RADIUS: f32 = 0.05;
const MAX_RADIUS: f32 = 5_000.;
/// Fraction of the radius gained or lost per unit of wheel delta.
const ZOOM_SPEED: f32 = 0.001;

/// Camera on a sphere around `target`.  `theta` is the azimuth around +Y and `phi` the polar angle
/// measured down from +Y.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
  pub theta: f32,
  pub phi: f32,
  pub radius: f32,
  pub target: Point3<f32>,
}

impl Default for OrbitCamera {
  fn default() -> Self {
    OrbitCamera {
      theta: PI / 4.,
      phi: PI / 3.,
      radius: 5.,
      target: Point3::origin(),
    }
  }
}

impl OrbitCamera {
  /// Looks at the origin, where `Mesh::model_matrix` puts the center of the road, from far enough
  /// out that the whole surface is in view.
  pub fn framing(mesh: &Mesh) -> Self {
    let extent = mesh.road_length.max(mesh.lane_width);
    OrbitCamera {
      radius: clamp(extent * 1.5, MIN_RADIUS, MAX_RADIUS),
      ..Default::default()
    }
  }

  pub fn eye(&self) -> Point3<f32> {
    let (sin_phi, cos_phi) = self.phi.sin_cos();
    let (sin_theta, cos_theta) = self.theta.sin_cos();
    self.target
      + self.radius * Vector3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
  }

  pub fn view_matrix(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(&self.eye(), &self.target, &Vector3::y())
  }

  pub fn rotate(&mut self, delta_theta: f32, delta_phi: f32) {
    self.theta = (self.theta + delta_theta).rem_euclid(2. * PI);
    self.phi = clamp(self.phi + delta_phi, MIN_PHI, MAX_PHI);
  }

  pub fn zoom(&mut self, delta: f32) {
    self.radius = clamp(self.radius * (delta * ZOOM_SPEED).exp(), MIN_RADIUS, MAX_RADIUS);
  }
}

/// Drag-to-rotate and wheel-to-zoom handling for an `OrbitCamera`, driven by explicit calls from
/// whatever owns the input events.
#[derive(Clone, Debug, Default)]
pub struct OrbitControls {
  pub camera: OrbitCamera,
  /// Last pointer position while a drag is in progress.
  drag_origin: Option<(f32, f32)>,
}

impl OrbitControls {
  pub fn new(camera: OrbitCamera) -> Self {
    OrbitControls {
      camera,
      drag_origin: None,
    }
  }

  pub fn is_dragging(&self) -> bool {
    self.drag_origin.is_some()
  }

  pub fn pointer_down(&mut self, x: f32, y: f32) {
    self.drag_origin = Some((x, y));
  }

  pub fn pointer_up(&mut self) {
    self.drag_origin = None;
  }

  /// Returns `true` if the camera moved.  A full drag across the viewport is one full turn.
  pub fn pointer_move(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) -> bool {
    let Some((old_x, old_y)) = self.drag_origin else {
      return false;
    };
    if viewport_width <= 0. || viewport_height <= 0. {
      return false;
    }

    let delta_theta = (x - old_x) * 2. * PI / viewport_width;
    let delta_phi = (y - old_y) * 2. * PI / viewport_height;
    self.drag_origin = Some((x, y));
    if delta_theta == 0. && delta_phi == 0. {
      return false;
    }

    self.camera.rotate(delta_theta, delta_phi);
    true
  }

  pub fn wheel(&mut self, delta: f32) {
    self.camera.zoom(delta);
  }
}

pub fn projection_matrix(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
  Matrix4::new_perspective(aspect, fov_y_degrees.to_radians(), near, far)
}
