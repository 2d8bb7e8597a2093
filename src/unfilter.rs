#![forbid(unsafe_code)]

//! Reversal of the per-scanline filtering that PNG applies before
//! compression.

use crate::{error::PngError, header::IHDR};

/// The Paeth predictor: whichever of `a` (left), `b` (above), `c` (upper
/// left) is closest to `a + b - c`.
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The PNG spec is extremely specific that you shall not, under any
  // circumstances, alter the order of evaluation of this expression's tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Given the `header` and the decompressed-but-filtered bytes, computes the
/// absolute pixel bytes into `dest`.
///
/// Each filtered scanline is one filter marker byte followed by
/// `width * bytes_per_pixel` delta-encoded data bytes; each reconstructed
/// scanline is the same length without the marker. All filter math is
/// modulo 256. Rows are processed strictly in order because every row's
/// reconstruction can read the row above it.
///
/// A filter marker outside the five defined values is treated the same as
/// "no filter" and the row's bytes pass through unchanged, which is what the
/// decoders this one is meant to stand in for have always done with such
/// streams. Strict readings of the PNG spec would call the stream corrupt
/// instead.
///
/// ## Failure
/// * You **are** allowed to pass buffers larger than required; the leading
///   bytes of `filtered` are consumed and the leading bytes of `dest` are
///   written.
/// * Buffers too small for the image the header describes fail with
///   [`UnfilterWasNotGivenEnoughData`](PngError::UnfilterWasNotGivenEnoughData),
///   before any byte is written.
pub fn reconstruct_scanlines(
  header: &IHDR, filtered: &[u8], dest: &mut [u8],
) -> Result<(), PngError> {
  let bpp = header.bytes_per_pixel()?;
  let stride = header.bytes_per_scanline()?;
  let height = header.height as usize;
  if filtered.len() < (stride + 1).saturating_mul(height) {
    return Err(PngError::UnfilterWasNotGivenEnoughData);
  }
  if dest.len() < stride.saturating_mul(height) {
    return Err(PngError::UnfilterWasNotGivenEnoughData);
  }

  // an empty previous row reads as all zeroes, which is exactly the row
  // that's implied above the first real row.
  let mut previous: &[u8] = &[];
  let src_rows = filtered.chunks_exact(stride + 1).take(height);
  let dst_rows = dest.chunks_exact_mut(stride).take(height);
  for (src_row, dst_row) in src_rows.zip(dst_rows) {
    let (filter, raw) = src_row.split_at(1);
    match filter[0] {
      1 => {
        // Sub
        for x in 0..stride {
          let left = if x >= bpp { dst_row[x - bpp] } else { 0 };
          dst_row[x] = raw[x].wrapping_add(left);
        }
      }
      2 => {
        // Up
        for x in 0..stride {
          let above = previous.get(x).copied().unwrap_or(0);
          dst_row[x] = raw[x].wrapping_add(above);
        }
      }
      3 => {
        // Average
        for x in 0..stride {
          let left = if x >= bpp { dst_row[x - bpp] } else { 0 };
          let above = previous.get(x).copied().unwrap_or(0);
          dst_row[x] = raw[x].wrapping_add(((left as u32 + above as u32) / 2) as u8);
        }
      }
      4 => {
        // Paeth
        for x in 0..stride {
          let left = if x >= bpp { dst_row[x - bpp] } else { 0 };
          let above = previous.get(x).copied().unwrap_or(0);
          let upper_left = if x >= bpp { previous.get(x - bpp).copied().unwrap_or(0) } else { 0 };
          dst_row[x] = raw[x].wrapping_add(paeth_predict(left, above, upper_left));
        }
      }
      _ => {
        // None, and unknown filter markers passing through unchanged.
        dst_row.copy_from_slice(raw);
      }
    }
    previous = dst_row;
  }
  Ok(())
}
