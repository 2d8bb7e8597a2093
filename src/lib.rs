#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]

//! A crate for decoding truecolor PNG images.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! Only truecolor (RGB) and truecolor-with-alpha (RGBA) images at 8 bits per
//! channel are decoded. Indexed color, grayscale, other bit depths, and
//! interlacing are all rejected with a [`PngError`] rather than decoded.
//!
//! ## Library Design Assumptions
//!
//! The entire PNG data stream is assumed to be in memory as a single byte
//! slice. Each stage of decoding consumes the complete output of the stage
//! before it. This crate does *not* attempt "stream" decoding where only a
//! minimal amount of data is live at once.
//!
//! ## Automatic Decoding
//!
//! Just call [`decode_rgba8`] and you'll get a [`Bitmap`] of [`RGBA8`]
//! pixels, or an error saying what went wrong. This requires the `alloc` and
//! `miniz_oxide` crate features (both on by default).
//!
//! ## Manual Decoding
//!
//! If you want full control over when allocations happen you can run the
//! stages yourself:
//!
//! 1) Check [`is_png_signature_correct`] and then call [`png_get_header`] to
//!    get the [`IHDR`] information. This describes the width, height, and
//!    pixel format.
//! 2) Call
//!    [`get_zlib_decompression_requirement`](IHDR::get_zlib_decompression_requirement)
//!    to determine how much space the decompressed-but-still-filtered data
//!    needs, and obtain a buffer of that size. Because of how PNG works you
//!    *cannot* decompress directly into the final image buffer (a filter
//!    marker byte is mixed in at the start of every scanline).
//! 3) Call [`png_get_idat`] to get an iterator over the compressed data
//!    slices. PNG allows more than one `IDAT` chunk in an image, and all of
//!    them together form a single zlib data stream. It's suggested to use
//!    [`decompress_slice_iter_to_slice`](miniz_oxide::inflate::decompress_slice_iter_to_slice),
//!    but any zlib decompressor will work. This gives you *filtered* data,
//!    not the final data you want.
//! 4) Call [`reconstruct_scanlines`] to reverse the per-scanline filtering,
//!    writing the absolute pixel bytes into a destination buffer of
//!    `height * width * bytes_per_pixel` bytes.
//! 5) Group the reconstructed bytes into pixels: 4 bytes each for RGBA, 3
//!    bytes each for RGB (alpha implied fully opaque).
//!
//! ## Parsing Errors
//!
//! Quoting [section 13.2 of the PNG
//! spec](https://www.w3.org/TR/2003/REC-PNG-20031110/#13Decoders.Errors):
//!
//! > Errors that have little or no effect on the processing of the image may
//! > be ignored, while those that affect critical data shall be dealt with in
//! > a manner appropriate to the application.
//!
//! Accordingly, this crate ignores:
//!
//! * All the chunk ordering rules for ancillary chunks, which it skips
//!   entirely.
//! * Both of the checksum systems (CRC32 on each chunk, Adler32 on the zlib
//!   data). These come from an era (1996) when disks and networks were a lot
//!   less capable of preserving your data. The declared CRC values are read
//!   off the stream and discarded without verification.
//! * A missing `IEND` chunk. A stream that simply stops at a chunk boundary
//!   decodes as far as its data goes.
//!
//! Anything that affects the pixel data itself (a truncated chunk payload, a
//! zlib stream of the wrong size, a malformed `IHDR`) is a hard error.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod pixel_formats;
pub use pixel_formats::*;

#[cfg(feature = "alloc")]
mod image;
#[cfg(feature = "alloc")]
pub use image::*;

mod chunk;
pub use chunk::*;

mod header;
pub use header::*;

mod unfilter;
pub use unfilter::*;

mod decode;
pub use decode::*;
