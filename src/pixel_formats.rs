//! Module for the pixel formats that decoding can produce.
//!
//! Both types here are plain-old-data with an alignment of 1, so a
//! reconstructed scanline of bytes can be reinterpreted as a slice of pixels
//! with [`cast_slice`](bytemuck::cast_slice) instead of being copied
//! byte by byte.

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An RGBA value, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl From<RGB8> for RGBA8 {
  /// The alpha channel becomes fully opaque.
  #[inline]
  #[must_use]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    Self { r, g, b, a: 255 }
  }
}
