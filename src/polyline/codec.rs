//! Variable-length text encoding of integers.
//!
//! Each value is split into 5-bit chunks, least significant first. Every
//! chunk but the last carries the 0x20 continuation bit, and each chunk is
//! offset by 63 so the output is printable ASCII in `'?'..='~'`.

use geo::Coord;

use crate::error::{GeoError, Result};

const OFFSET: u8 = 63;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: u64 = 0x1f;
const CONTINUATION: u64 = 0x20;

/// Coordinates are stored as integer multiples of this step
pub const COORD_FACTOR: f64 = 1e5;

/// Append the unsigned encoding of `value` to `out`.
pub fn encode_unsigned(mut value: u64, out: &mut String) {
    while value >= CONTINUATION {
        out.push(chunk_char(CONTINUATION | (value & CHUNK_MASK)));
        value >>= CHUNK_BITS;
    }
    out.push(chunk_char(value));
}

/// Append the signed encoding of `value` to `out`.
///
/// The sign is folded into the lowest bit: `n << 1`, inverted when negative.
pub fn encode_signed(value: i64, out: &mut String) {
    let shifted = value.wrapping_shl(1);
    let folded = if value < 0 { !shifted } else { shifted };
    encode_unsigned(folded as u64, out);
}

fn chunk_char(chunk: u64) -> char {
    // chunk <= 0x3f, so the sum stays within '?'..='~'
    char::from(OFFSET + chunk as u8)
}

/// Reads encoded values one at a time from a byte string.
pub(crate) struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn next_unsigned(&mut self) -> Result<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let position = self.pos;
            let byte = *self
                .bytes
                .get(position)
                .ok_or(GeoError::InvalidEncoding { position })?;
            if !(OFFSET..=OFFSET + 0x3f).contains(&byte) || shift >= u64::BITS {
                return Err(GeoError::InvalidEncoding { position });
            }
            let chunk = u64::from(byte - OFFSET);
            let bits = chunk & CHUNK_MASK;
            // the last chunk may only use the bits left in a u64
            if shift + CHUNK_BITS > u64::BITS && bits >> (u64::BITS - shift) != 0 {
                return Err(GeoError::InvalidEncoding { position });
            }
            self.pos += 1;

            value |= bits << shift;
            shift += CHUNK_BITS;
            if chunk & CONTINUATION == 0 {
                return Ok(value);
            }
        }
    }

    pub(crate) fn next_signed(&mut self) -> Result<i64> {
        let folded = self.next_unsigned()?;
        let magnitude = (folded >> 1) as i64;
        Ok(if folded & 1 == 1 { !magnitude } else { magnitude })
    }
}

/// Decode an encoded points string back into coordinates.
///
/// Deltas are accumulated and scaled by 1e-5; the result equals the floored
/// input coordinates of the retained points.
pub fn decode_points(text: &str) -> Result<Vec<Coord<f64>>> {
    let mut decoder = Decoder::new(text);
    let mut coords = Vec::new();
    let (mut x, mut y) = (0i64, 0i64);

    while !decoder.is_empty() {
        x = accumulate(&mut decoder, x)?;
        y = accumulate(&mut decoder, y)?;
        coords.push(Coord {
            x: x as f64 / COORD_FACTOR,
            y: y as f64 / COORD_FACTOR,
        });
    }

    Ok(coords)
}

fn accumulate(decoder: &mut Decoder<'_>, total: i64) -> Result<i64> {
    let position = decoder.pos;
    let delta = decoder.next_signed()?;
    total
        .checked_add(delta)
        .ok_or(GeoError::InvalidEncoding { position })
}

/// Decode an encoded levels string.
pub fn decode_levels(text: &str) -> Result<Vec<u32>> {
    let mut decoder = Decoder::new(text);
    let mut levels = Vec::new();
    while !decoder.is_empty() {
        let position = decoder.pos;
        let level = decoder.next_unsigned()?;
        levels.push(u32::try_from(level).map_err(|_| GeoError::InvalidEncoding { position })?);
    }
    Ok(levels)
}
