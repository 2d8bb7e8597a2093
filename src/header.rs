#![forbid(unsafe_code)]

//! The `IHDR` chunk: image dimensions and pixel format.

use crate::error::PngError;

/// The types of color that PNG supports.
///
/// This crate only *decodes* the [`RGB`](Self::RGB) and [`RGBA`](Self::RGBA)
/// types, but headers naming the other types still parse, so that the
/// decoder can say *why* it won't process an image instead of just calling
/// it malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::IhdrIllegalData),
    })
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels, never 0
  pub width: u32,
  /// height in pixels, never 0
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced.
  ///
  /// Interlaced images parse but don't decode.
  pub is_interlaced: bool,
}

impl IHDR {
  /// The number of bytes of one whole pixel.
  ///
  /// ## Failure
  /// Only the two formats this crate decodes have an answer: 3 for 8-bit
  /// RGB, 4 for 8-bit RGBA. Anything else is `PixelFormatNotSupported`.
  #[inline]
  pub const fn bytes_per_pixel(&self) -> Result<usize, PngError> {
    match (self.bit_depth, self.color_type) {
      (8, PngColorType::RGB) => Ok(3),
      (8, PngColorType::RGBA) => Ok(4),
      _ => Err(PngError::PixelFormatNotSupported),
    }
  }

  /// The number of pixel data bytes in one scanline, excluding the filter
  /// marker byte.
  #[inline]
  pub const fn bytes_per_scanline(&self) -> Result<usize, PngError> {
    match self.bytes_per_pixel() {
      Ok(bpp) => Ok((self.width as usize) * bpp),
      Err(e) => Err(e),
    }
  }

  /// Gets the buffer size required to perform the zlib decompression.
  ///
  /// This is `height * (bytes_per_scanline + 1)`: every scanline carries one
  /// filter marker byte in front of its pixel data. You need this value
  /// *before* decompressing because the decompressor requires a destination
  /// capacity bound up front.
  #[inline]
  pub const fn get_zlib_decompression_requirement(&self) -> Result<usize, PngError> {
    match self.bytes_per_scanline() {
      Ok(scanline) => Ok((scanline + 1).saturating_mul(self.height as usize)),
      Err(e) => Err(e),
    }
  }
}

impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  /// Interprets the 13-byte `IHDR` chunk payload.
  ///
  /// The compression method and filter method bytes are read but not
  /// validated: PNG only ever defined one value for each.
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, _compression_method, _filter_method, interlace_method] =>
      {
        let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
        let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
        if width == 0 || height == 0 {
          return Err(PngError::ImageDimensionsTooSmall);
        }
        Ok(Self {
          width,
          height,
          bit_depth: match *color_type {
            0 if [1, 2, 4, 8, 16].contains(bit_depth) => *bit_depth,
            2 if [8, 16].contains(bit_depth) => *bit_depth,
            3 if [1, 2, 4, 8].contains(bit_depth) => *bit_depth,
            4 if [8, 16].contains(bit_depth) => *bit_depth,
            6 if [8, 16].contains(bit_depth) => *bit_depth,
            _ => return Err(PngError::IhdrIllegalData),
          },
          color_type: PngColorType::try_from(*color_type)?,
          is_interlaced: match interlace_method {
            0 => false,
            1 => true,
            _ => return Err(PngError::IhdrIllegalData),
          },
        })
      }
      _ => Err(PngError::IhdrIllegalData),
    }
  }
}
