//! # Protocol-Data / Side-Data Codec
//!
//! The repeated named-blob structure attached to nearly every payload.
//!
//! ## Ordered-List Encoding (alpha, v1, v1.1)
//!
//! ```text
//! [countPrefixLength: 1] [count: countPrefixLength bytes, big-endian] [entry]*count
//! ```
//!
//! `countPrefixLength = max(1, ceil(log2(count + 1) / 8))` — the minimum
//! number of bytes that represents `count`, with the edge case that a count
//! of zero still takes one byte. This is NOT the minimal-bytes length
//! convention used by var-octet-strings elsewhere; it is protocol-specific
//! and the byte-width steps land exactly at powers of 256:
//! counts {0, 1, 255, 256, 65535, 65536} take {1, 1, 1, 2, 2, 3} bytes.
//!
//! Each entry: name var-octet-string (ASCII), one content-type byte, data
//! var-octet-string. Entry order is part of the wire format.
//!
//! ## Keyed Encoding (ledger generation)
//!
//! A fixed single-byte count followed by name/data pairs — a name-to-bytes
//! mapping with no content-type tag. Kept as a distinct strategy selected by
//! the version configuration, not a special case inside the list codec.

use crate::error::{CodecError, Result};
use crate::names::NameTable;
use crate::oer::{Reader, Writer};
use crate::packet::{ContentType, ProtocolData, ProtocolDataEntry};

/// Number of count bytes the ordered-list encoding uses for `count`.
///
/// Equivalent to `max(1, ceil(log2(count + 1) / 8))` without touching
/// floating point.
pub(crate) fn count_prefix_len(count: usize) -> usize {
    if count == 0 {
        1
    } else {
        let bits = usize::BITS - count.leading_zeros();
        ((bits + 7) / 8) as usize
    }
}

fn write_entry_name(writer: &mut Writer, name: &str, names: &NameTable) -> Result<()> {
    if !name.is_ascii() {
        return Err(CodecError::InvalidArgument(format!(
            "protocol-data name must be ASCII: {name:?}"
        )));
    }
    match names.lookup(name) {
        Some(encoded) => writer.write_bytes(encoded),
        None => writer.write_var_octet_string(name.as_bytes()),
    }
    Ok(())
}

fn read_entry_name<'a>(reader: &mut Reader<'a>) -> Result<&'a str> {
    let raw = reader.read_var_octet_string()?;
    std::str::from_utf8(raw)
        .ok()
        .filter(|name| name.is_ascii())
        .ok_or_else(|| CodecError::Malformed("non-ASCII protocol-data name".into()))
}

/// Encode an ordered protocol-data list.
pub fn write_protocol_data(
    writer: &mut Writer,
    entries: &ProtocolData,
    names: &NameTable,
) -> Result<()> {
    let count = entries.len();
    let prefix_len = count_prefix_len(count);
    writer.write_u8(prefix_len as u8);
    for shift in (0..prefix_len).rev() {
        writer.write_u8((count >> (8 * shift)) as u8);
    }
    for entry in entries {
        write_entry_name(writer, &entry.name, names)?;
        writer.write_u8(entry.content_type.into());
        writer.write_var_octet_string(&entry.data);
    }
    Ok(())
}

/// Decode an ordered protocol-data list.
///
/// Non-minimal count encodings are accepted; a count-prefix length of zero,
/// above eight, or longer than the remaining buffer is malformed.
pub fn read_protocol_data(reader: &mut Reader<'_>) -> Result<ProtocolData> {
    let prefix_len = usize::from(reader.read_u8()?);
    if prefix_len == 0 || prefix_len > 8 || prefix_len > reader.remaining() {
        return Err(CodecError::Malformed(format!(
            "count prefix of {prefix_len} byte(s) inconsistent with remaining buffer of {}",
            reader.remaining()
        )));
    }
    let mut count = 0u64;
    for &byte in reader.read_bytes(prefix_len)? {
        count = count << 8 | u64::from(byte);
    }

    let mut entries = Vec::new();
    for _ in 0..count {
        let name = read_entry_name(reader)?.to_owned();
        let content_type = ContentType::try_from(reader.read_u8()?)?;
        let data = reader.read_var_octet_string()?.to_vec();
        entries.push(ProtocolDataEntry {
            name,
            content_type,
            data,
        });
    }
    Ok(entries)
}

/// Encode side data in the keyed single-byte-count form.
///
/// The content-type tag is not carried by this encoding; entries decode as
/// [`ContentType::OctetStream`].
pub fn write_side_data_keyed(
    writer: &mut Writer,
    entries: &ProtocolData,
    names: &NameTable,
) -> Result<()> {
    let count = u8::try_from(entries.len()).map_err(|_| {
        CodecError::InvalidArgument(format!(
            "keyed side data holds at most 255 entries, got {}",
            entries.len()
        ))
    })?;
    writer.write_u8(count);
    for entry in entries {
        write_entry_name(writer, &entry.name, names)?;
        writer.write_var_octet_string(&entry.data);
    }
    Ok(())
}

/// Decode keyed side data.
pub fn read_side_data_keyed(reader: &mut Reader<'_>) -> Result<ProtocolData> {
    let count = reader.read_u8()?;
    let mut entries = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let name = read_entry_name(reader)?.to_owned();
        let data = reader.read_var_octet_string()?.to_vec();
        entries.push(ProtocolDataEntry {
            name,
            content_type: ContentType::OctetStream,
            data,
        });
    }
    Ok(entries)
}
