//! # Envelope Layer
//!
//! Every packet shares the same outer framing:
//!
//! ```text
//! [type: 1] [requestId: 4, big-endian] [payload: var-octet-string]
//! ```
//!
//! The envelope knows nothing about payload contents or version numbering;
//! it moves a type byte, a correlation id, and opaque payload bytes. Bytes
//! after the declared payload length are silently ignored — historical
//! decoders were lenient here and interoperability requires preserving that.

use crate::error::Result;
use crate::oer::{Reader, Writer};

/// Frame a payload: type byte, request id, then the payload as a
/// var-octet-string.
pub fn write_envelope(writer: &mut Writer, wire_type: u8, request_id: u32, payload: &[u8]) {
    writer.write_u8(wire_type);
    writer.write_u32(request_id);
    writer.write_var_octet_string(payload);
}

/// Read an envelope, returning the raw type byte, the request id, and the
/// payload slice. Trailing bytes in the reader are left untouched.
pub fn read_envelope<'a>(reader: &mut Reader<'a>) -> Result<(u8, u32, &'a [u8])> {
    let wire_type = reader.read_u8()?;
    let request_id = reader.read_u32()?;
    let payload = reader.read_var_octet_string()?;
    Ok((wire_type, request_id, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn envelope_round_trip() {
        let mut w = Writer::new();
        write_envelope(&mut w, 6, 0xdead_beef, b"payload");
        let bytes = w.into_vec();
        assert_eq!(&bytes[..6], &[6, 0xde, 0xad, 0xbe, 0xef, 7]);

        let mut r = Reader::new(&bytes);
        let (t, id, payload) = read_envelope(&mut r).unwrap();
        assert_eq!(t, 6);
        assert_eq!(id, 0xdead_beef);
        assert_eq!(payload, b"payload");
        assert!(r.is_empty());
    }

    #[test]
    fn empty_payload_round_trip() {
        let mut w = Writer::new();
        write_envelope(&mut w, 1, 0, b"");
        let bytes = w.into_vec();
        assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0]);

        let mut r = Reader::new(&bytes);
        let (t, id, payload) = read_envelope(&mut r).unwrap();
        assert_eq!((t, id), (1, 0));
        assert!(payload.is_empty());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut w = Writer::new();
        write_envelope(&mut w, 2, 7, b"xy");
        let mut bytes = w.into_vec();
        bytes.extend_from_slice(&[0xff, 0xff, 0xff]);

        let mut r = Reader::new(&bytes);
        let (_, _, payload) = read_envelope(&mut r).unwrap();
        assert_eq!(payload, b"xy");
        assert_eq!(r.remaining(), 3);
    }

    #[test]
    fn truncated_request_id_fails() {
        let mut r = Reader::new(&[6, 0, 0]);
        assert_eq!(read_envelope(&mut r), Err(CodecError::Truncated(2)));
    }

    #[test]
    fn truncated_payload_fails() {
        // Declares 5 payload bytes, provides 2.
        let mut r = Reader::new(&[6, 0, 0, 0, 1, 5, 0xaa, 0xbb]);
        assert_eq!(read_envelope(&mut r), Err(CodecError::Truncated(3)));
    }
}
