//! Radiance HDR (RGBE) input support.
//!
//! Reads RGBE files with either flat or new-style RLE scanlines and
//! decodes the shared-exponent pixels to linear RGB f32.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use webhdr_core::RgbImage;

const HDR_MAGIC: &str = "#?";

/// Reads an HDR (Radiance RGBE) file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<RgbImage> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let (width, height) = read_header(&mut reader)?;
    let data = read_pixels(&mut reader, width as usize, height as usize)?;

    RgbImage::from_data(width, height, data)
        .map_err(|e| IoError::DecodeError(e.to_string()))
}

fn read_header<R: BufRead>(reader: &mut R) -> IoResult<(u32, u32)> {
    let mut line = String::new();

    reader.read_line(&mut line)?;
    if !trim_line(&line).starts_with(HDR_MAGIC) {
        return Err(IoError::InvalidFile("HDR magic not found".into()));
    }

    loop {
        line.clear();
        let bytes = reader.read_line(&mut line)?;
        if bytes == 0 {
            return Err(IoError::InvalidFile("missing HDR resolution line".into()));
        }
        let line = trim_line(&line);

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('+') || line.starts_with('-') {
            return parse_resolution(line)
                .ok_or_else(|| IoError::InvalidFile("invalid HDR resolution line".into()));
        }

        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case("FORMAT") {
                let value = value.trim();
                if !value.eq_ignore_ascii_case("32-bit_rle_rgbe") {
                    return Err(IoError::UnsupportedFormat(value.to_string()));
                }
            }
        }
    }
}

fn read_pixels<R: Read>(reader: &mut R, width: usize, height: usize) -> IoResult<Vec<f32>> {
    let mut first = [0u8; 4];
    reader.read_exact(&mut first)?;

    let use_rle = width >= 8
        && width <= 0x7fff
        && first[0] == 2
        && first[1] == 2
        && ((first[2] as usize) << 8 | first[3] as usize) == width;

    let mut rgbe = vec![0u8; width * height * 4];

    if use_rle {
        let mut scanline = vec![0u8; width * 4];
        decode_rle_scanline(reader, width, &mut scanline, first)?;
        rgbe[0..width * 4].copy_from_slice(&scanline);

        for y in 1..height {
            let mut header = [0u8; 4];
            reader.read_exact(&mut header)?;
            decode_rle_scanline(reader, width, &mut scanline, header)?;
            let offset = y * width * 4;
            rgbe[offset..offset + width * 4].copy_from_slice(&scanline);
        }
    } else {
        rgbe[0..4].copy_from_slice(&first);
        reader.read_exact(&mut rgbe[4..])?;
    }

    let mut data = Vec::with_capacity(width * height * 3);
    for chunk in rgbe.chunks_exact(4) {
        let (r, g, b) = rgbe_to_f32(chunk[0], chunk[1], chunk[2], chunk[3]);
        data.push(r);
        data.push(g);
        data.push(b);
    }

    Ok(data)
}

fn decode_rle_scanline<R: Read>(
    reader: &mut R,
    width: usize,
    out: &mut [u8],
    header: [u8; 4],
) -> IoResult<()> {
    if header[0] != 2 || header[1] != 2 {
        return Err(IoError::InvalidFile("HDR RLE header invalid".into()));
    }
    let encoded_width = ((header[2] as usize) << 8) | (header[3] as usize);
    if encoded_width != width {
        return Err(IoError::InvalidFile("HDR RLE width mismatch".into()));
    }

    let mut channel = vec![0u8; width];
    for c in 0..4 {
        let mut idx = 0usize;
        while idx < width {
            let mut count = [0u8; 1];
            reader.read_exact(&mut count)?;
            let count = count[0] as usize;
            if count > 128 {
                let run = count - 128;
                if idx + run > width {
                    return Err(IoError::InvalidFile("HDR RLE run overflow".into()));
                }
                let mut value = [0u8; 1];
                reader.read_exact(&mut value)?;
                for _ in 0..run {
                    channel[idx] = value[0];
                    idx += 1;
                }
            } else {
                let run = count;
                if idx + run > width {
                    return Err(IoError::InvalidFile("HDR RLE run overflow".into()));
                }
                reader.read_exact(&mut channel[idx..idx + run])?;
                idx += run;
            }
        }

        for x in 0..width {
            out[x * 4 + c] = channel[x];
        }
    }

    Ok(())
}

fn rgbe_to_f32(r: u8, g: u8, b: u8, e: u8) -> (f32, f32, f32) {
    if e == 0 {
        return (0.0, 0.0, 0.0);
    }
    let exp = (e as i32) - 136;
    let f = 2.0_f32.powi(exp);
    (r as f32 * f, g as f32 * f, b as f32 * f)
}

/// Parses the Radiance resolution line.
///
/// Only the standard `-Y <height> +X <width>` orientation (scanlines
/// top-to-bottom, pixels left-to-right) is accepted. The other seven
/// orientations would require flipping or transposing the decoded
/// pixels, which this reader does not do, so they are rejected rather
/// than decoded with the wrong layout.
fn parse_resolution(line: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 4 || parts[0] != "-Y" || parts[2] != "+X" {
        return None;
    }

    let height: u32 = parts[1].parse().ok()?;
    let width: u32 = parts[3].parse().ok()?;

    if width > 0 && height > 0 {
        Some((width, height))
    } else {
        None
    }
}

fn trim_line(line: &str) -> &str {
    line.trim_end_matches(&['\r', '\n'][..])
}
