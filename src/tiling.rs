//! Deterministic assignment of photos to lattice cells.
//!
//! A cell's photo is a pure function of `(row, col, seed, photos)`: the
//! coordinates and seed are folded into one 32-bit word with a spatial hash,
//! that word is pushed through a sine-based noise function, and the resulting
//! fraction in `[0, 1)` picks an index into the photo list.
//!
//! Nothing is remembered between calls, so re-resolving a cell (buffer overlap,
//! re-mount after panning away and back) always shows the same photo, and a new
//! seed remaps every cell at once.

use crate::types::{CellCoordinate, PhotoRecord};

/// Multiplier applied to the row index.
pub const ROW_PRIME: u32 = 73_856_093;
/// Multiplier applied to the column index.
pub const COL_PRIME: u32 = 19_349_663;
/// Multiplier applied to the seed.
pub const SEED_PRIME: u32 = 83_492_791;
/// Scale applied to `sin(h)` before taking the fractional part.
pub const SINE_SCALE: f64 = 43_758.545_312_3;

/// Fold a cell and seed into one 32-bit word.
///
/// Coordinates wrap into 32 bits before mixing, so cells 2^32 apart share a hash.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn spatial_hash(cell: CellCoordinate, seed: u32) -> i32 {
    let h = (cell.row as u32).wrapping_mul(ROW_PRIME)
        ^ (cell.col as u32).wrapping_mul(COL_PRIME)
        ^ seed.wrapping_mul(SEED_PRIME);
    h as i32
}

/// `fract(sin(h) * SINE_SCALE)`, always in `[0, 1)`.
pub fn unit_noise(h: i32) -> f64 {
    let x = f64::from(h).sin() * SINE_SCALE;
    let frac = x - x.floor();
    // floor() can round x - floor(x) up to exactly 1.0 for tiny negative x
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// Index of the photo assigned to `cell` in a list of `len` photos.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn tile_index(cell: CellCoordinate, seed: u32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let value = unit_noise(spatial_hash(cell, seed));
    let index = (value * len as f64).floor() as usize;
    Some(index.min(len - 1))
}

/// The photo shown at `cell` for `seed`, or `None` for an empty list.
pub fn resolve_tile(cell: CellCoordinate, seed: u32, photos: &[PhotoRecord]) -> Option<&PhotoRecord> {
    tile_index(cell, seed, photos.len()).and_then(|i| photos.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(n: usize) -> Vec<PhotoRecord> {
        (0..n)
            .map(|i| PhotoRecord::new(i.to_string(), format!("/p/{i}.jpg")))
            .collect()
    }

    #[test]
    fn test_empty_list_resolves_to_none() {
        assert!(resolve_tile(CellCoordinate::new(0, 0), 0, &[]).is_none());
        assert_eq!(tile_index(CellCoordinate::new(0, 0), 0, 0), None);
    }

    #[test]
    fn test_single_photo_fills_every_cell() {
        let list = photos(1);
        for row in -5..5 {
            for col in -5..5 {
                assert_eq!(tile_index(CellCoordinate::new(row, col), 99, list.len()), Some(0));
            }
        }
    }

    #[test]
    fn test_noise_stays_in_unit_interval() {
        for h in [i32::MIN, -1, 0, 1, 12_345, i32::MAX] {
            let v = unit_noise(h);
            assert!((0.0..1.0).contains(&v), "noise {v} out of range for {h}");
        }
    }

    #[test]
    fn test_hash_mixes_seed() {
        let cell = CellCoordinate::new(3, -7);
        assert_ne!(spatial_hash(cell, 1), spatial_hash(cell, 2));
    }
}
