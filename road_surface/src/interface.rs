use wasm_bindgen::prelude::*;

use crate::{
  camera::{DEFAULT_FAR, DEFAULT_FOV_Y_DEGREES, DEFAULT_NEAR},
  generate, projection_matrix, GenerateError, GeometryConfig, IndexBuffer, Mesh, OrbitCamera,
  OrbitControls,
};

static mut DID_INIT: bool = false;

fn maybe_init() {
  unsafe {
    if DID_INIT {
      return;
    }
    DID_INIT = true;
  }

  console_error_panic_hook::set_once();
  wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
}

pub struct RoadSurfaceCtx {
  mesh: Mesh,
  controls: OrbitControls,
}

impl RoadSurfaceCtx {
  pub fn new(
    left: &[f32],
    right: &[f32],
    params_json: &str,
    seed: u64,
  ) -> Result<Self, GenerateError> {
    let config = if params_json.trim().is_empty() {
      GeometryConfig::default()
    } else {
      GeometryConfig::from_json(params_json)?
    };
    let mut rng = common::build_rng(seed);
    let mesh = generate(&config, left, right, &mut rng)?;
    let controls = OrbitControls::new(OrbitCamera::framing(&mesh));
    Ok(RoadSurfaceCtx { mesh, controls })
  }

  pub fn mesh(&self) -> &Mesh {
    &self.mesh
  }

  pub fn controls(&self) -> &OrbitControls {
    &self.controls
  }

  pub fn take_vertices(&mut self) -> Vec<f32> {
    std::mem::take(&mut self.mesh.vertices)
  }

  pub fn take_normals(&mut self) -> Vec<f32> {
    std::mem::take(&mut self.mesh.normals)
  }

  /// Widens 16 bit indices if needed.
  pub fn take_indices(&mut self) -> Vec<u32> {
    match std::mem::replace(&mut self.mesh.indices, IndexBuffer::U32(Vec::new())) {
      IndexBuffer::U16(indices) => indices.into_iter().map(|ix| ix as u32).collect(),
      IndexBuffer::U32(indices) => indices,
    }
  }

  /// Returns an empty vec if the mesh was built with 32 bit indices.
  pub fn take_indices_u16(&mut self) -> Vec<u16> {
    match &mut self.mesh.indices {
      IndexBuffer::U16(indices) => std::mem::take(indices),
      IndexBuffer::U32(_) => Vec::new(),
    }
  }
}

fn matrix_to_vec(mat: &nalgebra::Matrix4<f32>) -> Vec<f32> {
  mat.as_slice().to_owned()
}

#[wasm_bindgen]
pub fn road_surface_generate(
  left: &[f32],
  right: &[f32],
  params_json: &str,
  seed: u64,
) -> Result<*mut RoadSurfaceCtx, JsError> {
  maybe_init();

  match RoadSurfaceCtx::new(left, right, params_json, seed) {
    Ok(ctx) => Ok(Box::into_raw(Box::new(ctx))),
    Err(err) => {
      log::error!("{err}");
      Err(JsError::new(&err.to_string()))
    }
  }
}

#[wasm_bindgen]
pub fn road_surface_free(ctx: *mut RoadSurfaceCtx) {
  drop(unsafe { Box::from_raw(ctx) });
}

#[wasm_bindgen]
pub fn road_surface_take_vertices(ctx: *mut RoadSurfaceCtx) -> Vec<f32> {
  let ctx = unsafe { &mut *ctx };
  ctx.take_vertices()
}

#[wasm_bindgen]
pub fn road_surface_take_normals(ctx: *mut RoadSurfaceCtx) -> Vec<f32> {
  let ctx = unsafe { &mut *ctx };
  ctx.take_normals()
}

#[wasm_bindgen]
pub fn road_surface_take_indices(ctx: *mut RoadSurfaceCtx) -> Vec<u32> {
  let ctx = unsafe { &mut *ctx };
  ctx.take_indices()
}

#[wasm_bindgen]
pub fn road_surface_take_indices_u16(ctx: *mut RoadSurfaceCtx) -> Vec<u16> {
  let ctx = unsafe { &mut *ctx };
  ctx.take_indices_u16()
}

#[wasm_bindgen]
pub fn road_surface_get_road_length(ctx: *const RoadSurfaceCtx) -> f32 {
  let ctx = unsafe { &*ctx };
  ctx.mesh.road_length
}

#[wasm_bindgen]
pub fn road_surface_get_placement_offset(ctx: *const RoadSurfaceCtx) -> Vec<f32> {
  let ctx = unsafe { &*ctx };
  let offset = ctx.mesh.placement_offset();
  vec![offset.x, offset.y, offset.z]
}

#[wasm_bindgen]
pub fn road_surface_get_model_matrix(ctx: *const RoadSurfaceCtx) -> Vec<f32> {
  let ctx = unsafe { &*ctx };
  matrix_to_vec(&ctx.mesh.model_matrix())
}

#[wasm_bindgen]
pub fn road_surface_pointer_down(ctx: *mut RoadSurfaceCtx, x: f32, y: f32) {
  let ctx = unsafe { &mut *ctx };
  ctx.controls.pointer_down(x, y);
}

#[wasm_bindgen]
pub fn road_surface_pointer_up(ctx: *mut RoadSurfaceCtx) {
  let ctx = unsafe { &mut *ctx };
  ctx.controls.pointer_up();
}

/// Returns `true` if the view changed and the scene should be redrawn.
#[wasm_bindgen]
pub fn road_surface_pointer_move(
  ctx: *mut RoadSurfaceCtx,
  x: f32,
  y: f32,
  viewport_width: f32,
  viewport_height: f32,
) -> bool {
  let ctx = unsafe { &mut *ctx };
  ctx
    .controls
    .pointer_move(x, y, viewport_width, viewport_height)
}

#[wasm_bindgen]
pub fn road_surface_wheel(ctx: *mut RoadSurfaceCtx, delta: f32) {
  let ctx = unsafe { &mut *ctx };
  ctx.controls.wheel(delta);
}

/// Column-major, ready for `uniformMatrix4fv`.
#[wasm_bindgen]
pub fn road_surface_get_view_matrix(ctx: *const RoadSurfaceCtx) -> Vec<f32> {
  let ctx = unsafe { &*ctx };
  matrix_to_vec(&ctx.controls.camera.view_matrix())
}

#[wasm_bindgen]
pub fn road_surface_get_projection_matrix(aspect: f32) -> Vec<f32> {
  matrix_to_vec(&projection_matrix(
    DEFAULT_FOV_Y_DEGREES,
    aspect,
    DEFAULT_NEAR,
    DEFAULT_FAR,
  ))
}
