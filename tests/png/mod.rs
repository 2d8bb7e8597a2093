use miniz_oxide::deflate::compress_to_vec_zlib;
use unpng::{decode_rgba8, PngError, PngRawChunkIter, RGBA8, PNG_SIGNATURE};
use walkdir::WalkDir;

/// Appends one chunk to a PNG byte stream under construction.
///
/// The trailing CRC is written as zero: the decoder reads checksum fields
/// off the stream and discards them without verification, and the tests
/// lean on that.
fn push_chunk(out: &mut Vec<u8>, ty: [u8; 4], data: &[u8]) {
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(&ty);
  out.extend_from_slice(data);
  out.extend_from_slice(&0_u32.to_be_bytes());
}

fn ihdr_payload(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> [u8; 13] {
  let mut payload = [0; 13];
  payload[0..4].copy_from_slice(&width.to_be_bytes());
  payload[4..8].copy_from_slice(&height.to_be_bytes());
  payload[8] = bit_depth;
  payload[9] = color_type;
  payload[12] = interlace;
  payload
}

/// Builds signature + IHDR + the given IDAT payloads + IEND.
fn build_png(ihdr: &[u8; 13], idat_parts: &[&[u8]]) -> Vec<u8> {
  let mut out = PNG_SIGNATURE.to_vec();
  push_chunk(&mut out, *b"IHDR", ihdr);
  for part in idat_parts {
    push_chunk(&mut out, *b"IDAT", part);
  }
  push_chunk(&mut out, *b"IEND", &[]);
  out
}

/// Forward-filters raw scanlines the way an encoder would, one filter type
/// per row.
fn filter_rows(raw: &[u8], stride: usize, bpp: usize, filters: &[u8]) -> Vec<u8> {
  fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
    let (a_, b_, c_) = (a as i32, b as i32, c as i32);
    let p = a_ + b_ - c_;
    let (pa, pb, pc) = ((p - a_).abs(), (p - b_).abs(), (p - c_).abs());
    if pa <= pb && pa <= pc {
      a
    } else if pb <= pc {
      b
    } else {
      c
    }
  }
  let mut out = Vec::new();
  for (y, (row, filter)) in raw.chunks_exact(stride).zip(filters.iter().copied()).enumerate() {
    out.push(filter);
    for x in 0..stride {
      let left = if x >= bpp { row[x - bpp] } else { 0 };
      let above = if y > 0 { raw[(y - 1) * stride + x] } else { 0 };
      let upper_left = if y > 0 && x >= bpp { raw[(y - 1) * stride + x - bpp] } else { 0 };
      let predicted = match filter {
        0 => 0,
        1 => left,
        2 => above,
        3 => ((left as u32 + above as u32) / 2) as u8,
        4 => paeth_predict(left, above, upper_left),
        _ => unreachable!(),
      };
      out.push(row[x].wrapping_sub(predicted));
    }
  }
  out
}

#[test]
fn test_PngRawChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    for _ in PngRawChunkIter::new(&v) {
      //
    }
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let mut v = vec![0; 1024];
    getrandom::getrandom(&mut v).unwrap();
    for _ in PngRawChunkIter::new(&v) {
      //
    }
  }
}

#[test]
fn test_decode_2x2_rgba_with_no_filtering() {
  #[rustfmt::skip]
  let raw: [u8; 16] = [
    255, 0, 0, 255,    0, 255, 0, 255,
    0, 0, 255, 255,    255, 255, 255, 255,
  ];
  let mut filtered = Vec::new();
  filtered.push(0);
  filtered.extend_from_slice(&raw[0..8]);
  filtered.push(0);
  filtered.extend_from_slice(&raw[8..16]);
  let zlib = compress_to_vec_zlib(&filtered, 6);
  let png = build_png(&ihdr_payload(2, 2, 8, 6, 0), &[&zlib]);

  let bitmap = decode_rgba8(&png).unwrap();
  assert_eq!(bitmap.width, 2);
  assert_eq!(bitmap.height, 2);
  assert_eq!(
    bitmap.pixels,
    [
      RGBA8 { r: 255, g: 0, b: 0, a: 255 },
      RGBA8 { r: 0, g: 255, b: 0, a: 255 },
      RGBA8 { r: 0, g: 0, b: 255, a: 255 },
      RGBA8 { r: 255, g: 255, b: 255, a: 255 },
    ]
  );
  // row-major addressing: (x, y) with the origin at the top left.
  assert_eq!(bitmap.get(1, 0), Some(&RGBA8 { r: 0, g: 255, b: 0, a: 255 }));
  assert_eq!(bitmap.get(0, 1), Some(&RGBA8 { r: 0, g: 0, b: 255, a: 255 }));
  assert_eq!(bitmap.get(2, 0), None);
}

#[test]
fn test_decode_rgb_fills_in_opaque_alpha() {
  let raw: [u8; 6] = [10, 20, 30, 40, 50, 60];
  let filtered = filter_rows(&raw, 6, 3, &[0]);
  let zlib = compress_to_vec_zlib(&filtered, 6);
  let png = build_png(&ihdr_payload(2, 1, 8, 2, 0), &[&zlib]);

  let bitmap = decode_rgba8(&png).unwrap();
  assert_eq!(
    bitmap.pixels,
    [RGBA8 { r: 10, g: 20, b: 30, a: 255 }, RGBA8 { r: 40, g: 50, b: 60, a: 255 }]
  );
}

#[test]
fn test_every_row_filter_type_decodes() {
  let stride = 4 * 3;
  // 4x5 RGB, every byte different, one row per filter type.
  let raw: Vec<u8> = (0..stride * 5).map(|i| (i * 31 % 256) as u8).collect();
  let filtered = filter_rows(&raw, stride, 3, &[0, 1, 2, 3, 4]);
  let zlib = compress_to_vec_zlib(&filtered, 6);
  let png = build_png(&ihdr_payload(4, 5, 8, 2, 0), &[&zlib]);

  let bitmap = decode_rgba8(&png).unwrap();
  assert_eq!(bitmap.pixels.len(), 4 * 5);
  for (pixel, rgb) in bitmap.pixels.iter().zip(raw.chunks_exact(3)) {
    assert_eq!([pixel.r, pixel.g, pixel.b, pixel.a], [rgb[0], rgb[1], rgb[2], 255]);
  }
}

#[test]
fn test_idat_split_points_mean_nothing() {
  let stride = 3 * 4;
  let raw: Vec<u8> = (0..stride * 3).map(|i| (i * 7 % 256) as u8).collect();
  let filtered = filter_rows(&raw, stride, 4, &[0, 1, 4]);
  let zlib = compress_to_vec_zlib(&filtered, 6);

  let whole = build_png(&ihdr_payload(3, 3, 8, 6, 0), &[&zlib]);
  // split at deliberately awkward boundaries, including an empty chunk.
  let split = build_png(&ihdr_payload(3, 3, 8, 6, 0), &[&zlib[..1], &[], &zlib[1..5], &zlib[5..]]);

  let a = decode_rgba8(&whole).unwrap();
  let b = decode_rgba8(&split).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_ancillary_chunks_are_skipped_without_desyncing() {
  let filtered = filter_rows(&[1, 2, 3], 3, 3, &[0]);
  let zlib = compress_to_vec_zlib(&filtered, 6);

  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, *b"IHDR", &ihdr_payload(1, 1, 8, 2, 0));
  push_chunk(&mut png, *b"tEXt", b"Comment\0asdf");
  push_chunk(&mut png, *b"IDAT", &zlib);
  push_chunk(&mut png, *b"tIME", &[7, 230, 8, 7, 0, 0, 0]);
  push_chunk(&mut png, *b"IEND", &[]);

  let bitmap = decode_rgba8(&png).unwrap();
  assert_eq!(bitmap.pixels, [RGBA8 { r: 1, g: 2, b: 3, a: 255 }]);
}

#[test]
fn test_declared_crc_values_are_never_verified() {
  let filtered = filter_rows(&[9, 9, 9], 3, 3, &[0]);
  let zlib = compress_to_vec_zlib(&filtered, 6);

  let mut png = PNG_SIGNATURE.to_vec();
  for (ty, data) in
    [(*b"IHDR", &ihdr_payload(1, 1, 8, 2, 0)[..]), (*b"IDAT", &zlib[..]), (*b"IEND", &[][..])]
  {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(&ty);
    png.extend_from_slice(data);
    png.extend_from_slice(&0xDEAD_BEEF_u32.to_be_bytes());
  }
  assert!(decode_rgba8(&png).is_ok());
}

#[test]
fn test_missing_iend_still_decodes() {
  let filtered = filter_rows(&[5, 6, 7, 8], 4, 4, &[0]);
  let zlib = compress_to_vec_zlib(&filtered, 6);
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, *b"IHDR", &ihdr_payload(1, 1, 8, 6, 0));
  push_chunk(&mut png, *b"IDAT", &zlib);
  // no IEND: the stream just stops at a chunk boundary.
  let bitmap = decode_rgba8(&png).unwrap();
  assert_eq!(bitmap.pixels, [RGBA8 { r: 5, g: 6, b: 7, a: 8 }]);
}

#[test]
fn test_bad_signature_is_fatal() {
  let mut png = build_png(&ihdr_payload(1, 1, 8, 6, 0), &[]);
  png[0] = 0x88;
  assert_eq!(decode_rgba8(&png), Err(PngError::BytesAreNotPng));
}

#[test]
fn test_zero_width_fails_before_inflate_runs() {
  // the IDAT payload is garbage that any zlib decompressor would reject, so
  // reaching inflate at all would produce a different error than this.
  let png = build_png(&ihdr_payload(0, 2, 8, 6, 0), &[b"definitely not zlib"]);
  assert_eq!(decode_rgba8(&png), Err(PngError::ImageDimensionsTooSmall));
}

#[test]
fn test_plte_chunk_is_refused() {
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, *b"IHDR", &ihdr_payload(1, 1, 8, 3, 0));
  push_chunk(&mut png, *b"PLTE", &[255, 0, 0, 0, 255, 0]);
  push_chunk(&mut png, *b"IDAT", b"xx");
  push_chunk(&mut png, *b"IEND", &[]);
  assert_eq!(decode_rgba8(&png), Err(PngError::PaletteNotSupported));
}

#[test]
fn test_grayscale_is_refused() {
  let zlib = compress_to_vec_zlib(&[0, 128], 6);
  let png = build_png(&ihdr_payload(1, 1, 8, 0, 0), &[&zlib]);
  assert_eq!(decode_rgba8(&png), Err(PngError::PixelFormatNotSupported));
}

#[test]
fn test_sixteen_bit_depth_is_refused() {
  let png = build_png(&ihdr_payload(1, 1, 16, 6, 0), &[]);
  assert_eq!(decode_rgba8(&png), Err(PngError::PixelFormatNotSupported));
}

#[test]
fn test_interlaced_images_are_refused() {
  let png = build_png(&ihdr_payload(2, 2, 8, 6, 1), &[]);
  assert_eq!(decode_rgba8(&png), Err(PngError::InterlaceNotSupported));
}

#[test]
fn test_duplicate_ihdr_is_refused() {
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, *b"IHDR", &ihdr_payload(1, 1, 8, 6, 0));
  push_chunk(&mut png, *b"IHDR", &ihdr_payload(1, 1, 8, 6, 0));
  push_chunk(&mut png, *b"IEND", &[]);
  assert_eq!(decode_rgba8(&png), Err(PngError::MultipleIhdrChunksPresent));
}

#[test]
fn test_truncated_idat_payload_is_refused() {
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, *b"IHDR", &ihdr_payload(1, 1, 8, 6, 0));
  // declares 64 payload bytes but the stream ends after 3.
  png.extend_from_slice(&64_u32.to_be_bytes());
  png.extend_from_slice(b"IDAT");
  png.extend_from_slice(&[1, 2, 3]);
  assert_eq!(decode_rgba8(&png), Err(PngError::ChunkEndedEarly));
}

#[test]
fn test_wrong_decompressed_length_is_refused() {
  // a valid zlib stream holding too few bytes for a 2x2 RGBA image.
  let zlib = compress_to_vec_zlib(&[0; 9], 6);
  let png = build_png(&ihdr_payload(2, 2, 8, 6, 0), &[&zlib]);
  assert_eq!(decode_rgba8(&png), Err(PngError::DecompressedDataWrongLength));
}

#[test]
fn test_garbage_idat_is_an_inflate_failure() {
  let png = build_png(&ihdr_payload(1, 1, 8, 6, 0), &[b"definitely not zlib"]);
  assert_eq!(decode_rgba8(&png), Err(PngError::InflateFailed));
}
