//! Procedural height textures.

/// Side of the default striped heightmap.
pub const STRIPES_SIZE: u32 = 100;

/// Default stripe period, in texels.
pub const STRIPES_PERIOD: u32 = 10;

/// Default stripe height, out of 255.
pub const STRIPES_LEVEL: u8 = 100;

/// Generate a `size`×`size` RGB8 heightmap made of horizontal stripes.
///
/// Rows are grouped in runs of `period`; the first half of each run is flat (0) and the second half is raised to
/// `level`.
pub fn striped_heightmap(size: u32, period: u32, level: u8) -> Vec<u8> {
  let period = period.max(1);
  let size = size as usize;
  let mut texels = Vec::with_capacity(size * size * 3);

  for row in 0..size as u32 {
    let height = if row % period >= period / 2 { level } else { 0 };
    texels.extend(std::iter::repeat(height).take(size * 3));
  }

  texels
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_stripes_alternate_every_five_rows() {
    let texels = striped_heightmap(STRIPES_SIZE, STRIPES_PERIOD, STRIPES_LEVEL);
    let row = |r: usize| &texels[r * 300..(r + 1) * 300];

    assert_eq!(texels.len(), 100 * 100 * 3);
    assert!(row(0).iter().all(|&t| t == 0));
    assert!(row(4).iter().all(|&t| t == 0));
    assert!(row(5).iter().all(|&t| t == 100));
    assert!(row(9).iter().all(|&t| t == 100));
    assert!(row(10).iter().all(|&t| t == 0));
  }

  #[test]
  fn zero_period_is_flat_raised() {
    let texels = striped_heightmap(4, 0, 7);

    assert!(texels.iter().all(|&t| t == 7));
  }
}
