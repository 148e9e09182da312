//! # Packet Codec
//!
//! Top-level serialize/deserialize entry points and per-kind convenience
//! helpers.
//!
//! The codec is a pure transform: bytes in, packet out (or the reverse),
//! with no I/O, no retries, and no shared mutable state. Every entry point
//! takes the protocol generation explicitly or defaults to
//! [`ProtocolVersion::LATEST`]; there is no global version flag.
//!
//! ## Wire Format
//! ```text
//! [type: 1] [requestId: 4, big-endian] [payload: var-octet-string]
//! ```
//! The payload layout depends on the packet type and generation; see the
//! submodules.

pub mod envelope;
pub mod fields;
pub mod payload;
pub mod side_data;

use tracing::trace;

use crate::error::{CodecError, Result};
use crate::names::NameTable;
use crate::oer::{Reader, Writer};
use crate::packet::{
    Amount, Digest, ErrorDetails, InnerError, Packet, ProtocolData, TransferDescriptor,
};
use crate::version::ProtocolVersion;
use uuid::Uuid;

/// Serialize a packet in the latest stable generation.
pub fn serialize(packet: &Packet) -> Result<Vec<u8>> {
    serialize_versioned(packet, ProtocolVersion::LATEST)
}

/// Serialize a packet in a specific generation.
pub fn serialize_versioned(packet: &Packet, version: ProtocolVersion) -> Result<Vec<u8>> {
    serialize_with_table(packet, version, NameTable::common())
}

/// Serialize with a caller-supplied name table instead of the shared
/// default.
pub fn serialize_with_table(
    packet: &Packet,
    version: ProtocolVersion,
    names: &NameTable,
) -> Result<Vec<u8>> {
    let config = version.config();
    let packet_type = packet.packet_type();
    let wire_type = config.wire_code(packet_type).ok_or_else(|| {
        CodecError::InvalidArgument(format!("{packet_type} is not defined in {version:?}"))
    })?;

    let mut body = Writer::new();
    payload::write_payload(&mut body, &packet.payload, &config, names)?;

    let mut writer = Writer::with_capacity(body.len() + 9);
    envelope::write_envelope(&mut writer, wire_type, packet.request_id, body.as_slice());
    Ok(writer.into_vec())
}

/// Deserialize a packet in the latest stable generation.
pub fn deserialize(bytes: &[u8]) -> Result<Packet> {
    deserialize_versioned(bytes, ProtocolVersion::LATEST)
}

/// Deserialize a packet in a specific generation.
pub fn deserialize_versioned(bytes: &[u8], version: ProtocolVersion) -> Result<Packet> {
    let config = version.config();
    let mut reader = Reader::new(bytes);
    let (wire_type, request_id, body) = envelope::read_envelope(&mut reader)?;
    let packet_type = config
        .packet_type(wire_type)
        .ok_or(CodecError::UnrecognizedType(wire_type))?;
    trace!(%packet_type, request_id, body_len = body.len(), "decoding packet");
    let payload = payload::read_payload(body, packet_type, &config)?;
    Ok(Packet {
        request_id,
        payload,
    })
}

impl Packet {
    /// Encode in the latest stable generation.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    /// Encode in a specific generation.
    pub fn to_bytes_versioned(&self, version: ProtocolVersion) -> Result<Vec<u8>> {
        serialize_versioned(self, version)
    }

    /// Decode from the latest stable generation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        deserialize(bytes)
    }

    /// Decode from a specific generation.
    pub fn from_bytes_versioned(bytes: &[u8], version: ProtocolVersion) -> Result<Self> {
        deserialize_versioned(bytes, version)
    }
}

/// Build and serialize a MESSAGE in one step.
pub fn serialize_message(request_id: u32, protocol_data: ProtocolData) -> Result<Vec<u8>> {
    serialize(&Packet::message(request_id, protocol_data))
}

/// Build and serialize a RESPONSE in one step.
pub fn serialize_response(request_id: u32, protocol_data: ProtocolData) -> Result<Vec<u8>> {
    serialize(&Packet::response(request_id, protocol_data))
}

/// Build and serialize an ERROR in one step.
pub fn serialize_error(
    request_id: u32,
    details: ErrorDetails,
    protocol_data: ProtocolData,
) -> Result<Vec<u8>> {
    serialize(&Packet::error(request_id, details, protocol_data))
}

/// Build and serialize a PREPARE from a transfer descriptor in one step.
pub fn serialize_prepare(
    request_id: u32,
    transfer: TransferDescriptor,
    protocol_data: ProtocolData,
) -> Result<Vec<u8>> {
    serialize(&Packet::prepare(request_id, transfer, protocol_data))
}

/// Build and serialize a FULFILL in one step.
pub fn serialize_fulfill(
    request_id: u32,
    transfer_id: Uuid,
    fulfillment: Digest,
    protocol_data: ProtocolData,
) -> Result<Vec<u8>> {
    serialize(&Packet::fulfill(
        request_id,
        transfer_id,
        fulfillment,
        protocol_data,
    ))
}

/// Build and serialize a REJECT in one step.
pub fn serialize_reject(
    request_id: u32,
    transfer_id: Uuid,
    rejection_reason: InnerError,
    protocol_data: ProtocolData,
) -> Result<Vec<u8>> {
    serialize(&Packet::reject(
        request_id,
        transfer_id,
        Some(rejection_reason),
        protocol_data,
    ))
}

/// Build and serialize a TRANSFER in one step.
pub fn serialize_transfer(
    request_id: u32,
    amount: Amount,
    protocol_data: ProtocolData,
) -> Result<Vec<u8>> {
    serialize(&Packet::transfer(request_id, amount, protocol_data))
}
