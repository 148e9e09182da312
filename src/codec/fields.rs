//! # Field Helpers
//!
//! Wire forms of the scalar field types: 64-bit amounts, 16-byte transfer
//! identifiers, 32-byte digests, GeneralizedTime timestamps, and embedded
//! sub-packet capture.
//!
//! ## GeneralizedTime
//! Timestamps travel as the text `YYYYMMDDHHMMSS.mmmZ` — explicit century,
//! exactly three fractional digits, trailing `Z` — inside a
//! var-octet-string. Parsing validates that exact shape byte-for-byte
//! before any calendar interpretation.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use uuid::Uuid;

use crate::error::{CodecError, Result};
use crate::oer::{Reader, Writer};
use crate::packet::{Amount, Digest};
use crate::version::VersionConfig;

/// Write an amount as 8 big-endian bytes. The legacy generations split the
/// same bytes into a (hi, lo) pair of 32-bit words.
pub fn write_amount(writer: &mut Writer, amount: Amount, config: &VersionConfig) {
    if config.amount_as_word_pair {
        writer.write_u64_pair((amount.0 >> 32) as u32, amount.0 as u32);
    } else {
        writer.write_u64(amount.0);
    }
}

pub fn read_amount(reader: &mut Reader<'_>, config: &VersionConfig) -> Result<Amount> {
    let value = if config.amount_as_word_pair {
        reader.read_u64_pair()?
    } else {
        reader.read_u64()?
    };
    Ok(Amount(value))
}

/// Write a transfer identifier as its 16 raw bytes.
pub fn write_transfer_id(writer: &mut Writer, id: Uuid) {
    writer.write_bytes(id.as_bytes());
}

pub fn read_transfer_id(reader: &mut Reader<'_>) -> Result<Uuid> {
    let raw = reader.read_bytes(16)?;
    let raw: [u8; 16] = raw.try_into().map_err(|_| {
        // read_bytes(16) already guarantees the length
        CodecError::Malformed("transfer id must be 16 bytes".into())
    })?;
    Ok(Uuid::from_bytes(raw))
}

/// Write a condition or fulfillment digest as its 32 raw bytes.
pub fn write_digest(writer: &mut Writer, digest: Digest) {
    writer.write_bytes(&digest.0);
}

pub fn read_digest(reader: &mut Reader<'_>) -> Result<Digest> {
    let raw = reader.read_bytes(32)?;
    let raw: [u8; 32] = raw
        .try_into()
        .map_err(|_| CodecError::Malformed("digest must be 32 bytes".into()))?;
    Ok(Digest(raw))
}

/// Render a timestamp in GeneralizedTime form.
pub fn format_generalized_time(timestamp: &DateTime<Utc>) -> String {
    format!("{}Z", timestamp.format("%Y%m%d%H%M%S%.3f"))
}

/// Write a timestamp as a var-octet-string of GeneralizedTime text.
pub fn write_generalized_time(writer: &mut Writer, timestamp: &DateTime<Utc>) {
    writer.write_var_octet_string(format_generalized_time(timestamp).as_bytes());
}

/// Parse GeneralizedTime text. Anything other than 14 digits, a dot, three
/// digits and `Z` is malformed.
pub fn parse_generalized_time(raw: &[u8]) -> Result<DateTime<Utc>> {
    let malformed = || {
        CodecError::Malformed(format!(
            "invalid GeneralizedTime: {:?}",
            String::from_utf8_lossy(raw)
        ))
    };

    let well_shaped = raw.len() == 19
        && raw[..14].iter().all(u8::is_ascii_digit)
        && raw[14] == b'.'
        && raw[15..18].iter().all(u8::is_ascii_digit)
        && raw[18] == b'Z';
    if !well_shaped {
        return Err(malformed());
    }

    // The shape check above guarantees ASCII digits, so these cannot fail.
    let digits = |range: std::ops::Range<usize>| -> u32 {
        raw[range]
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'))
    };

    let date = NaiveDate::from_ymd_opt(digits(0..4) as i32, digits(4..6), digits(6..8))
        .ok_or_else(malformed)?;
    let time = date
        .and_hms_milli_opt(digits(8..10), digits(10..12), digits(12..14), digits(15..18))
        .ok_or_else(malformed)?;
    Ok(time.and_utc())
}

/// Read a var-octet-string-framed GeneralizedTime timestamp.
pub fn read_generalized_time(reader: &mut Reader<'_>) -> Result<DateTime<Utc>> {
    parse_generalized_time(reader.read_var_octet_string()?)
}

/// Truncate a timestamp to the millisecond precision the wire carries.
pub fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = timestamp.nanosecond();
    timestamp - chrono::Duration::nanoseconds(i64::from(nanos % 1_000_000))
}

/// Capture an embedded sub-packet — `[type][length-prefix][contents]` — as
/// one opaque blob for pass-through, using a bookmark so the length prefix
/// is both inspected and preserved verbatim.
pub fn read_embedded_packet<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8]> {
    let mark = reader.position();
    reader.read_u8()?;
    reader.skip_var_octet_string()?;
    Ok(reader.slice_since(mark))
}
