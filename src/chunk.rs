#![forbid(unsafe_code)]

//! Iteration over the length-tagged chunks of a PNG data stream.

use core::fmt::{Debug, Write};

use crate::error::PngError;

/// The first eight bytes of a PNG datastream should match these bytes.
///
/// This is the byte sequence of the big-endian value `0x89504E470D0A1A0A`.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not*
///   PNG data.
#[inline]
#[must_use]
pub const fn is_png_signature_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// The 4-byte ASCII tag naming a chunk's type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkTy(pub [u8; 4]);
impl PngChunkTy {
  /// Image header, always the first chunk.
  pub const IHDR: Self = Self(*b"IHDR");
  /// Palette data for indexed color.
  pub const PLTE: Self = Self(*b"PLTE");
  /// A fragment of the compressed image data.
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image trailer, the last chunk of a well-formed stream.
  pub const IEND: Self = Self(*b"IEND");
}
impl Debug for PngChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
///
/// The declared payload length isn't stored separately, it's just the length
/// of the borrowed `data` slice. The declared CRC is carried along but never
/// verified by this crate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub ty: PngChunkTy,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Chunk boundaries come from each chunk's declared length, so unrecognized
/// chunk types pass through here the same as recognized ones and consumers
/// can simply ignore the tags they don't care about.
///
/// The ends of a stream are handled unevenly on purpose:
///
/// * A stream that stops *between* chunks, or that stops partway into the
///   8-byte length/type pair, just ends the iteration. This tolerates a
///   missing `IEND` the same way a truncated download would present itself.
/// * A stream that stops partway into a chunk's declared payload, or into
///   the 4 trailing checksum bytes, yields one
///   [`ChunkEndedEarly`](PngError::ChunkEndedEarly) error and then ends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngRawChunkIter<'b>(&'b [u8]);
impl<'b> PngRawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  ///
  /// The signature bytes are *skipped*, not checked, so this iterator can be
  /// pointed at arbitrary data without panicking. Call
  /// [`is_png_signature_correct`] first if you want the check.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for PngRawChunkIter<'b> {
  type Item = Result<PngRawChunk<'b>, PngError>;
  fn next(&mut self) -> Option<Self::Item> {
    let chunk_len: u32 = if self.0.len() >= 4 {
      let (len_bytes, rest) = self.0.split_at(4);
      self.0 = rest;
      u32::from_be_bytes(len_bytes.try_into().unwrap())
    } else {
      self.0 = &[];
      return None;
    };
    let ty: PngChunkTy = if self.0.len() >= 4 {
      let (ty_bytes, rest) = self.0.split_at(4);
      self.0 = rest;
      PngChunkTy(ty_bytes.try_into().unwrap())
    } else {
      self.0 = &[];
      return None;
    };
    let data: &'b [u8] = if self.0.len() >= chunk_len as usize {
      let (data, rest) = self.0.split_at(chunk_len as usize);
      self.0 = rest;
      data
    } else {
      self.0 = &[];
      return Some(Err(PngError::ChunkEndedEarly));
    };
    let declared_crc: u32 = if self.0.len() >= 4 {
      let (crc_bytes, rest) = self.0.split_at(4);
      self.0 = rest;
      u32::from_be_bytes(crc_bytes.try_into().unwrap())
    } else {
      self.0 = &[];
      return Some(Err(PngError::ChunkEndedEarly));
    };
    Some(Ok(PngRawChunk { ty, data, declared_crc }))
  }
}
