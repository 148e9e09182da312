#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Edge-case tests: truncation, corruption, lenient decode paths, and the
//! version/variant mismatches the encoder refuses.

use btp_codec::{
    deserialize_versioned, serialize_versioned, Amount, CodecError, ContentType, Digest,
    ErrorDetails, ErrorPayload, InnerError, Packet, Payload, ProtocolDataEntry, ProtocolVersion,
    TransferDescriptor,
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn sample_details() -> ErrorDetails {
    ErrorDetails {
        code: "T00".to_string(),
        name: "UnreachableError".to_string(),
        triggered_at: Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap(),
        data: "".to_string(),
    }
}

fn sample_prepare(version: ProtocolVersion) -> Vec<u8> {
    let transfer = TransferDescriptor {
        transfer_id: Uuid::from_bytes([0x21; 16]),
        amount: Amount(1000),
        execution_condition: Digest([0x33; 32]),
        expires_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
    };
    serialize_versioned(&Packet::prepare(7, transfer, Vec::new()), version).expect("serialize")
}

// ============================================================================
// TRUNCATION
// ============================================================================

#[test]
fn every_strict_prefix_of_a_packet_fails_to_decode() {
    let bytes = sample_prepare(ProtocolVersion::V1);
    for len in 0..bytes.len() {
        assert!(
            deserialize_versioned(&bytes[..len], ProtocolVersion::V1).is_err(),
            "decoded from {len} of {} bytes",
            bytes.len()
        );
    }
}

#[test]
fn short_envelope_reports_missing_byte_count() {
    // Type byte present, request id cut short by two bytes.
    let err = deserialize_versioned(&[6, 0, 0], ProtocolVersion::V1_1).unwrap_err();
    assert!(matches!(err, CodecError::Truncated(2)), "{err:?}");
}

#[test]
fn payload_shorter_than_declared_is_truncated() {
    // Declares a 10-byte payload but carries 2.
    let err = deserialize_versioned(&[6, 0, 0, 0, 0, 10, 1, 0], ProtocolVersion::V1_1).unwrap_err();
    assert!(matches!(err, CodecError::Truncated(8)), "{err:?}");
}

// ============================================================================
// UNRECOGNIZED AND SHIFTED TYPE BYTES
// ============================================================================

#[test]
fn type_byte_zero_is_unrecognized_everywhere() {
    for version in [
        ProtocolVersion::Alpha,
        ProtocolVersion::V1,
        ProtocolVersion::V1_1,
        ProtocolVersion::Ledger,
    ] {
        let err = deserialize_versioned(&[0, 0, 0, 0, 0, 2, 1, 0], version).unwrap_err();
        assert!(
            matches!(err, CodecError::UnrecognizedType(0)),
            "{version:?}: {err:?}"
        );
    }
}

#[test]
fn transfer_byte_is_unrecognized_before_v1_1() {
    // Byte 7 is TRANSFER in v1.1 but undefined in v1.
    let packet = Packet::transfer(1, Amount(5), Vec::new());
    let bytes = serialize_versioned(&packet, ProtocolVersion::V1_1).expect("serialize");
    assert_eq!(bytes[0], 7);

    let err = deserialize_versioned(&bytes, ProtocolVersion::V1).unwrap_err();
    assert!(matches!(err, CodecError::UnrecognizedType(7)), "{err:?}");
}

#[test]
fn same_bytes_decode_to_different_types_across_generations() {
    // Byte 6 is REJECT in alpha but MESSAGE in v1. Give it a REJECT-shaped
    // body so both parses succeed.
    let packet = Packet::reject(9, Uuid::from_bytes([0x01; 16]), None, Vec::new());
    let bytes = serialize_versioned(&packet, ProtocolVersion::Alpha).expect("serialize");
    assert_eq!(bytes[0], 6);

    let as_alpha = deserialize_versioned(&bytes, ProtocolVersion::Alpha).expect("alpha");
    assert!(matches!(as_alpha.payload, Payload::Reject(_)));
}

// ============================================================================
// MALFORMED CONTENT
// ============================================================================

#[test]
fn corrupted_timestamp_is_malformed() {
    let mut bytes = sample_prepare(ProtocolVersion::V1);
    // Payload layout: 16 id + 8 amount + 32 condition puts the timestamp
    // var-octet-string at payload offset 56; the envelope header is 6 bytes.
    assert_eq!(bytes[62], 19);
    assert!(bytes[63].is_ascii_digit());
    bytes[63] = b'X';

    let err = deserialize_versioned(&bytes, ProtocolVersion::V1).unwrap_err();
    assert!(matches!(err, CodecError::Malformed(_)), "{err:?}");
}

#[test]
fn impossible_calendar_date_is_malformed() {
    let mut bytes = sample_prepare(ProtocolVersion::V1);
    // Month bytes of the timestamp text.
    bytes[67] = b'1';
    bytes[68] = b'3';

    let err = deserialize_versioned(&bytes, ProtocolVersion::V1).unwrap_err();
    assert!(matches!(err, CodecError::Malformed(_)), "{err:?}");
}

#[test]
fn oversized_count_prefix_is_malformed() {
    // MESSAGE whose protocol-data count prefix claims 9 bytes.
    let err = deserialize_versioned(&[6, 0, 0, 0, 0, 2, 9, 0], ProtocolVersion::V1_1).unwrap_err();
    assert!(matches!(err, CodecError::Malformed(_)), "{err:?}");
}

#[test]
fn zero_count_prefix_is_malformed() {
    let err = deserialize_versioned(&[6, 0, 0, 0, 0, 2, 0, 0], ProtocolVersion::V1_1).unwrap_err();
    assert!(matches!(err, CodecError::Malformed(_)), "{err:?}");
}

// ============================================================================
// LENIENT DECODE PATHS
// ============================================================================

#[test]
fn bytes_after_the_envelope_are_ignored() {
    let packet = Packet::message(3, Vec::new());
    let mut bytes = packet.to_bytes().expect("serialize");
    bytes.extend_from_slice(&[0xff, 0xff, 0xff]);
    assert_eq!(Packet::from_bytes(&bytes).expect("deserialize"), packet);
}

#[test]
fn unread_bytes_inside_the_payload_are_tolerated() {
    // Empty protocol-data list [1, 0] followed by an unread trailing byte,
    // all inside the declared payload.
    let bytes = [6, 0, 0, 0, 0, 3, 1, 0, 0xee];
    let packet = deserialize_versioned(&bytes, ProtocolVersion::V1_1).expect("deserialize");
    assert_eq!(packet, Packet::message(0, Vec::new()));
}

#[test]
fn non_minimal_count_prefix_round_trips_the_entries() {
    // Count of one declared in four bytes.
    let bytes = [6, 0, 0, 0, 0, 11, 4, 0, 0, 0, 1, 1, b'x', 0, 2, 0xab, 0xcd];
    let packet = deserialize_versioned(&bytes, ProtocolVersion::V1_1).expect("deserialize");
    assert_eq!(
        packet,
        Packet::message(
            0,
            vec![ProtocolDataEntry::new(
                "x",
                ContentType::OctetStream,
                vec![0xab, 0xcd],
            )],
        )
    );
}

// ============================================================================
// ENCODER REFUSALS
// ============================================================================

#[test]
fn invalid_error_codes_are_rejected_on_encode() {
    for code in ["", "F0", "F000", "é0"] {
        let mut details = sample_details();
        details.code = code.to_string();
        let packet = Packet::error(1, details, Vec::new());
        let err = serialize_versioned(&packet, ProtocolVersion::V1).unwrap_err();
        assert!(
            matches!(err, CodecError::InvalidErrorCode(_)),
            "{code:?}: {err:?}"
        );
    }
}

#[test]
fn structured_details_do_not_encode_in_alpha() {
    let packet = Packet::error(1, sample_details(), Vec::new());
    let err = serialize_versioned(&packet, ProtocolVersion::Alpha).unwrap_err();
    assert!(matches!(err, CodecError::InvalidArgument(_)), "{err:?}");
}

#[test]
fn opaque_blobs_do_not_encode_in_structured_generations() {
    let packet = Packet::new(
        1,
        Payload::Error(ErrorPayload {
            inner: InnerError::Opaque(vec![3, 1, 0]),
            protocol_data: Vec::new(),
        }),
    );
    for version in [ProtocolVersion::V1, ProtocolVersion::V1_1] {
        let err = serialize_versioned(&packet, version).unwrap_err();
        assert!(
            matches!(err, CodecError::InvalidArgument(_)),
            "{version:?}: {err:?}"
        );
    }
}

#[test]
fn reject_reason_presence_must_match_the_generation() {
    let with_reason = Packet::reject(
        1,
        Uuid::from_bytes([0x10; 16]),
        Some(InnerError::Details(sample_details())),
        Vec::new(),
    );
    let err = serialize_versioned(&with_reason, ProtocolVersion::Alpha).unwrap_err();
    assert!(matches!(err, CodecError::InvalidArgument(_)), "{err:?}");

    let without_reason = Packet::reject(1, Uuid::from_bytes([0x10; 16]), None, Vec::new());
    let err = serialize_versioned(&without_reason, ProtocolVersion::V1).unwrap_err();
    assert!(matches!(err, CodecError::InvalidArgument(_)), "{err:?}");
}

#[test]
fn ack_does_not_encode_after_alpha() {
    let packet = Packet::ack(1, Vec::new());
    for version in [
        ProtocolVersion::V1,
        ProtocolVersion::V1_1,
        ProtocolVersion::Ledger,
    ] {
        let err = serialize_versioned(&packet, version).unwrap_err();
        assert!(
            matches!(err, CodecError::InvalidArgument(_)),
            "{version:?}: {err:?}"
        );
    }
}

// ============================================================================
// LEDGER GENERATION
// ============================================================================

#[test]
fn ledger_side_data_is_keyed_with_a_single_count_byte() {
    let packet = Packet::message(
        1,
        vec![ProtocolDataEntry::new(
            "balance",
            ContentType::OctetStream,
            b"100".to_vec(),
        )],
    );
    let bytes = serialize_versioned(&packet, ProtocolVersion::Ledger).expect("serialize");
    // Envelope header, then the keyed count byte and the first name.
    assert_eq!(bytes[6], 1);
    assert_eq!(bytes[7], 7);
    assert_eq!(&bytes[8..15], b"balance");

    let decoded = deserialize_versioned(&bytes, ProtocolVersion::Ledger).expect("deserialize");
    assert_eq!(decoded, packet);
}

#[test]
fn ledger_refuses_oversized_keyed_side_data() {
    let entries = (0..256)
        .map(|_| ProtocolDataEntry::new("k", ContentType::OctetStream, Vec::new()))
        .collect();
    let packet = Packet::message(1, entries);
    let err = serialize_versioned(&packet, ProtocolVersion::Ledger).unwrap_err();
    assert!(matches!(err, CodecError::InvalidArgument(_)), "{err:?}");
}

// ============================================================================
// EMBEDDED ERROR PACKETS
// ============================================================================

#[test]
fn alpha_embedded_error_needs_valid_framing() {
    // ERROR in alpha is type byte 3. Body: a framed inner packet whose
    // declared length (5) runs past the end of the payload.
    let bytes = [3, 0, 0, 0, 0, 3, 3, 5, 0];
    let err = deserialize_versioned(&bytes, ProtocolVersion::Alpha).unwrap_err();
    assert!(matches!(err, CodecError::Truncated(_)), "{err:?}");

    // A length-of-length marker above 8 (here 200 & 0x7f = 72) is a
    // structural claim, not a short buffer.
    let bytes = [3, 0, 0, 0, 0, 3, 3, 200, 0];
    let err = deserialize_versioned(&bytes, ProtocolVersion::Alpha).unwrap_err();
    assert!(matches!(err, CodecError::Malformed(_)), "{err:?}");
}

#[test]
fn structured_reject_reason_must_embed_an_error_packet() {
    // REJECT in v1 is byte 5; the embedded sub-packet leads with MESSAGE's
    // type byte instead of ERROR's.
    let mut body = vec![0x01; 16];
    body.push(6); // MESSAGE, not ERROR
    body.extend_from_slice(&[1, 0]); // inner payload
    body.extend_from_slice(&[1, 0]); // outer protocol data

    let mut bytes = vec![5, 0, 0, 0, 0, body.len() as u8];
    bytes.extend_from_slice(&body);

    let err = deserialize_versioned(&bytes, ProtocolVersion::V1).unwrap_err();
    assert!(matches!(err, CodecError::UnrecognizedType(6)), "{err:?}");
}
