/// Cubic through `p1` and `p2` of a four-point stencil, with tangents estimated by finite
/// differences over caller-provided step lengths.
///
/// With both steps set to 2 this is a plain Catmull-Rom segment.  Longer steps flatten the tangent
/// on that side, which is how the resampler bridges the jump in sample density at the wheel
/// tracks.  Whatever the steps, `eval(0) == p1` and `eval(1) == p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cubic {
  pub a: f32,
  pub b: f32,
  pub c: f32,
  pub d: f32,
}

impl Cubic {
  pub fn new([p0, p1, p2, p3]: [f32; 4], (step1, step2): (f32, f32)) -> Self {
    let f0 = p1;
    let f1 = p2;
    let df0 = (p2 - p0) / step1;
    let df1 = (p3 - p1) / step2;

    Cubic {
      a: 2. * f0 - 2. * f1 + df0 + df1,
      b: -3. * f0 + 3. * f1 - 2. * df0 - df1,
      c: df0,
      d: f0,
    }
  }

  #[inline(always)]
  pub fn eval(&self, x: f32) -> f32 {
    ((self.a * x + self.b) * x + self.c) * x + self.d
  }

  /// Slope at `x`.
  pub fn derivative(&self, x: f32) -> f32 {
    (3. * self.a * x + 2. * self.b) * x + self.c
  }
}

#[inline(always)]
pub fn interpolate(stencil: [f32; 4], steps: (f32, f32), x: f32) -> f32 {
  Cubic::new(stencil, steps).eval(x)
}
