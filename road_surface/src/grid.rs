use std::ops::{Index, IndexMut};

/// Dense row-major 2D buffer.  Rows run along the road and columns run across it.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
  rows: usize,
  cols: usize,
  data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
  pub fn new(rows: usize, cols: usize) -> Self {
    Self::filled(rows, cols, T::default())
  }
}

impl<T: Clone> Grid<T> {
  pub fn filled(rows: usize, cols: usize, val: T) -> Self {
    Grid {
      rows,
      cols,
      data: vec![val; rows * cols],
    }
  }
}

impl<T> Grid<T> {
  #[inline(always)]
  pub fn rows(&self) -> usize {
    self.rows
  }

  #[inline(always)]
  pub fn cols(&self) -> usize {
    self.cols
  }

  #[inline(always)]
  fn offset(&self, row: usize, col: usize) -> usize {
    debug_assert!(
      row < self.rows && col < self.cols,
      "grid index ({row}, {col}) out of bounds for {}x{} grid",
      self.rows,
      self.cols
    );
    row * self.cols + col
  }

  pub fn get(&self, row: usize, col: usize) -> Option<&T> {
    if row >= self.rows || col >= self.cols {
      return None;
    }
    self.data.get(row * self.cols + col)
  }

  pub fn row(&self, row: usize) -> &[T] {
    let start = self.offset(row, 0);
    &self.data[start..start + self.cols]
  }

  pub fn as_slice(&self) -> &[T] {
    &self.data
  }
}

impl<T: Copy> Grid<T> {
  /// Overwrites `dst_row` with the contents of `src_row`.
  pub fn copy_row(&mut self, src_row: usize, dst_row: usize) {
    let src = self.offset(src_row, 0);
    let dst = self.offset(dst_row, 0);
    self.data.copy_within(src..src + self.cols, dst);
  }

  pub fn copy_col(&mut self, src_col: usize, dst_col: usize) {
    for row in 0..self.rows {
      let val = self[(row, src_col)];
      self[(row, dst_col)] = val;
    }
  }
}

impl<T> Index<(usize, usize)> for Grid<T> {
  type Output = T;

  #[inline(always)]
  fn index(&self, (row, col): (usize, usize)) -> &T {
    &self.data[self.offset(row, col)]
  }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
  #[inline(always)]
  fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
    let ix = self.offset(row, col);
    &mut self.data[ix]
  }
}
