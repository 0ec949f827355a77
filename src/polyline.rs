//! Encoded-polyline codec (the Google overview-polyline format).
//!
//! Coordinates are delta-encoded at 1e-5 precision as zig-zagged
//! variable-length integers, 5 bits per character, offset by 63, with
//! bit 0x20 flagging a continuation.

use crate::error::{PlannerError, Result};
use crate::types::Coordinate;

const PRECISION: f64 = 1e5;

/// Decode an encoded polyline into coordinates in encoding order.
/// An empty string decodes to an empty sequence.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        let (delta_lat, next) = decode_signed(bytes, index, encoded)?;
        let (delta_lon, next) = decode_signed(bytes, next, encoded)?;
        lat += delta_lat;
        lon += delta_lon;
        coordinates.push(Coordinate::new(lat as f64 / PRECISION, lon as f64 / PRECISION));
        index = next;
    }

    Ok(coordinates)
}

/// Encode coordinates into the polyline format. Inverse of [`decode`]
/// up to the codec's 1e-5 precision.
pub fn encode(coordinates: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for coordinate in coordinates {
        let lat = (coordinate.lat * PRECISION).round() as i64;
        let lon = (coordinate.lon * PRECISION).round() as i64;
        encode_signed(lat - prev_lat, &mut out);
        encode_signed(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn decode_signed(bytes: &[u8], mut index: usize, encoded: &str) -> Result<(i64, usize)> {
    let mut shift: u32 = 0;
    let mut accumulated: u64 = 0;

    loop {
        let byte = *bytes.get(index).ok_or_else(|| PlannerError::Parse {
            message: "truncated polyline: coordinate delta ended mid-sequence".to_string(),
            raw: encoded.to_string(),
        })?;
        if byte < 63 || shift > 60 {
            return Err(PlannerError::Parse {
                message: format!("invalid polyline byte 0x{byte:02x} at offset {index}"),
                raw: encoded.to_string(),
            });
        }
        let chunk = u64::from(byte - 63);
        accumulated |= (chunk & 0x1f) << shift;
        shift += 5;
        index += 1;
        if chunk < 0x20 {
            break;
        }
    }

    // Zig-zag: odd values are bitwise-complemented right shifts.
    let value = if accumulated & 1 != 0 {
        !((accumulated >> 1) as i64)
    } else {
        (accumulated >> 1) as i64
    };

    Ok((value, index))
}

fn encode_signed(value: i64, out: &mut String) {
    let mut zigzag = if value < 0 {
        !(value << 1) as u64
    } else {
        (value << 1) as u64
    };

    while zigzag >= 0x20 {
        out.push(char::from(((zigzag & 0x1f) as u8 | 0x20) + 63));
        zigzag >>= 5;
    }
    out.push(char::from(zigzag as u8 + 63));
}
