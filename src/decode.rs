#![forbid(unsafe_code)]

//! The top-level decode pipeline and its stage accessors.

use crate::{
  chunk::{PngChunkTy, PngRawChunkIter},
  error::PngError,
  header::IHDR,
};

#[cfg(all(feature = "alloc", feature = "miniz_oxide"))]
use crate::{
  chunk::is_png_signature_correct,
  header::PngColorType,
  image::Bitmap,
  pixel_formats::{RGB8, RGBA8},
  unfilter::reconstruct_scanlines,
};
#[cfg(all(feature = "alloc", feature = "miniz_oxide"))]
use alloc::vec::Vec;
#[cfg(all(feature = "alloc", feature = "miniz_oxide"))]
use bytemuck::cast_slice;

/// Gets the [IHDR] out of the PNG bytes.
///
/// The header must be the very first chunk of the stream, as the PNG spec
/// demands; a stream leading with any other chunk is refused rather than
/// searched.
pub fn png_get_header(bytes: &[u8]) -> Result<IHDR, PngError> {
  match PngRawChunkIter::new(bytes).next() {
    None => Err(PngError::NoChunksPresent),
    Some(Err(e)) => Err(e),
    Some(Ok(chunk)) if chunk.ty == PngChunkTy::IHDR => IHDR::try_from(chunk.data),
    Some(Ok(_)) => Err(PngError::FirstChunkNotIhdr),
  }
}

/// Gets an iterator over all the `IDAT` data slices in the PNG bytes.
///
/// PNG allows the compressed image data to be split across any number of
/// `IDAT` chunks, and the split points mean nothing: for decompression you
/// act like all the slices were one long byte sequence, in file order. Feed
/// this whole iterator to
/// [`decompress_slice_iter_to_slice`](miniz_oxide::inflate::decompress_slice_iter_to_slice)
/// or collect it yourself.
pub fn png_get_idat(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
  PngRawChunkIter::new(bytes)
    .filter_map(|chunk| chunk.ok())
    .filter(|chunk| chunk.ty == PngChunkTy::IDAT)
    .map(|chunk| chunk.data)
}

/// Decodes PNG bytes into a bitmap of [RGBA8] pixels.
///
/// RGB images decode with every alpha value fully opaque. Anything that
/// isn't 8-bit truecolor or truecolor-with-alpha refuses to decode; see
/// [`PngError`] for the ways this can go wrong.
///
/// The whole stream is validated before any buffer is allocated, so a
/// truncated chunk, a duplicate `IHDR`, or a `PLTE` chunk all fail before
/// the decompressor ever runs.
#[cfg(all(feature = "alloc", feature = "miniz_oxide"))]
#[cfg_attr(docs_rs, doc(cfg(all(feature = "alloc", feature = "miniz_oxide"))))]
pub fn decode_rgba8(bytes: &[u8]) -> Result<Bitmap<RGBA8>, PngError> {
  if !is_png_signature_correct(bytes) {
    return Err(PngError::BytesAreNotPng);
  }
  let ihdr = png_get_header(bytes)?;

  let mut ihdr_count = 0_u32;
  for chunk in PngRawChunkIter::new(bytes) {
    let chunk = chunk?;
    match chunk.ty {
      PngChunkTy::IHDR => {
        ihdr_count += 1;
        if ihdr_count > 1 {
          return Err(PngError::MultipleIhdrChunksPresent);
        }
      }
      PngChunkTy::PLTE => return Err(PngError::PaletteNotSupported),
      // IDAT is gathered below, IEND carries no payload, and ancillary
      // chunks are skipped entirely.
      _ => (),
    }
  }

  if ihdr.is_interlaced {
    return Err(PngError::InterlaceNotSupported);
  }
  if ihdr.width > 17_000 || ihdr.height > 17_000 {
    return Err(PngError::ImageDimensionsTooLarge);
  }

  // The decompressor needs its full output space up front, and the size is
  // known exactly from the header alone.
  let zlib_len = ihdr.get_zlib_decompression_requirement()?;
  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve(zlib_len)?;
  zlib_buffer.resize(zlib_len, 0);
  let decompressed_len = miniz_oxide::inflate::decompress_slice_iter_to_slice(
    &mut zlib_buffer,
    png_get_idat(bytes),
    true,
    true,
  )
  .map_err(|_| PngError::InflateFailed)?;
  if decompressed_len != zlib_len {
    return Err(PngError::DecompressedDataWrongLength);
  }

  let stride = ihdr.bytes_per_scanline()?;
  let mut recon: Vec<u8> = Vec::new();
  recon.try_reserve(stride * ihdr.height as usize)?;
  recon.resize(stride * ihdr.height as usize, 0);
  reconstruct_scanlines(&ihdr, &zlib_buffer, &mut recon)?;

  let mut pixels: Vec<RGBA8> = Vec::new();
  pixels.try_reserve(ihdr.width as usize * ihdr.height as usize)?;
  match ihdr.color_type {
    PngColorType::RGBA => pixels.extend_from_slice(cast_slice::<u8, RGBA8>(&recon)),
    PngColorType::RGB => {
      pixels.extend(cast_slice::<u8, RGB8>(&recon).iter().copied().map(RGBA8::from))
    }
    _ => return Err(PngError::PixelFormatNotSupported),
  }
  Ok(Bitmap { width: ihdr.width, height: ihdr.height, pixels })
}
