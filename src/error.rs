#![forbid(unsafe_code)]

//! The error type for everything that can go wrong during a decode.

use core::fmt::{Display, Formatter};

/// An error from the `unpng` crate.
///
/// Every fallible operation in the crate reports one of these. The first
/// error encountered wins, and no partial image is ever handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The data stream doesn't begin with the 8-byte PNG signature.
  BytesAreNotPng,

  /// The stream has no complete chunk at all after the signature.
  NoChunksPresent,

  /// The first chunk of the stream is something other than `IHDR`.
  FirstChunkNotIhdr,

  /// More than one `IHDR` chunk appeared in the stream.
  MultipleIhdrChunksPresent,

  /// The `IHDR` payload is malformed: wrong size, an unknown color type or
  /// interlace byte, or a bit depth that PNG doesn't allow for the color
  /// type.
  IhdrIllegalData,

  /// The declared width and/or height of this image is 0.
  ImageDimensionsTooSmall,

  /// The image is too large.
  ///
  /// The automatic decoder limits the width and height of images it processes
  /// to be 17,000 or less to prevent accidental out-of-memory problems.
  ImageDimensionsTooLarge,

  /// A chunk declared more payload (or checksum) bytes than the stream
  /// actually holds.
  ChunkEndedEarly,

  /// A `PLTE` chunk is present; indexed color is not supported.
  PaletteNotSupported,

  /// The image is interlaced; interlacing is not supported.
  InterlaceNotSupported,

  /// The image is a legal PNG, but not 8-bit truecolor or truecolor with
  /// alpha, which are the only pixel formats this crate decodes.
  PixelFormatNotSupported,

  /// The zlib decompressor rejected the image data stream.
  InflateFailed,

  /// Decompression produced a different number of bytes than the image
  /// header calls for.
  DecompressedDataWrongLength,

  /// A buffer handed to the scanline reconstructor was too small for the
  /// image described by the header.
  UnfilterWasNotGivenEnoughData,

  /// The allocator couldn't give us enough space.
  #[cfg(feature = "alloc")]
  Alloc,
}

impl Display for PngError {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    let msg = match self {
      Self::BytesAreNotPng => "signature check: first 8 bytes are not the PNG signature",
      Self::NoChunksPresent => "chunk parsing: no complete chunk in the stream",
      Self::FirstChunkNotIhdr => "chunk parsing: first chunk is not IHDR",
      Self::MultipleIhdrChunksPresent => "chunk parsing: more than one IHDR chunk",
      Self::IhdrIllegalData => "header: IHDR payload is malformed",
      Self::ImageDimensionsTooSmall => "header: declared width or height is zero",
      Self::ImageDimensionsTooLarge => "header: declared width or height exceeds 17,000",
      Self::ChunkEndedEarly => "chunk parsing: chunk payload ends before its declared length",
      Self::PaletteNotSupported => "PLTE chunk present: indexed color unsupported",
      Self::InterlaceNotSupported => "header: interlaced images unsupported",
      Self::PixelFormatNotSupported => {
        "header: only 8-bit truecolor and truecolor-with-alpha are supported"
      }
      Self::InflateFailed => "decompression: corrupt zlib stream in image data",
      Self::DecompressedDataWrongLength => {
        "decompression: output length doesn't match the image header"
      }
      Self::UnfilterWasNotGivenEnoughData => "unfiltering: buffer too small for the image",
      #[cfg(feature = "alloc")]
      Self::Alloc => "allocation failed",
    };
    f.write_str(msg)
  }
}

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
