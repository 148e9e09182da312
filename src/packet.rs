//! # Packet Model
//!
//! In-memory representation of every packet the codec understands.
//!
//! All types here are immutable value objects with structural equality:
//! construct, encode, compare, discard. There is no identity and no shared
//! mutable state, so values may move freely across threads.
//!
//! ## Boundary Representations
//! Several wire fields use a friendlier form at the API boundary:
//! - amounts are full-precision 64-bit integers, shown as decimal strings
//! - transfer identifiers are canonical hyphenated UUIDs
//! - condition/fulfillment digests are URL-safe unpadded base64
//! - timestamps are [`chrono::DateTime<Utc>`]

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::CodecError;

/// Logical packet type, independent of any version's wire numbering.
///
/// The wire byte for a logical type is a pure function of
/// (type, protocol version); see [`crate::version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    Ack,
    Response,
    Error,
    Prepare,
    Fulfill,
    Reject,
    Message,
    Transfer,
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PacketType::Ack => "ACK",
            PacketType::Response => "RESPONSE",
            PacketType::Error => "ERROR",
            PacketType::Prepare => "PREPARE",
            PacketType::Fulfill => "FULFILL",
            PacketType::Reject => "REJECT",
            PacketType::Message => "MESSAGE",
            PacketType::Transfer => "TRANSFER",
        };
        f.write_str(name)
    }
}

/// Declared content type of a protocol-data entry.
///
/// The codec never interprets entry contents; this tag is carried opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    OctetStream,
    TextUtf8,
    Json,
}

impl From<ContentType> for u8 {
    fn from(value: ContentType) -> u8 {
        match value {
            ContentType::OctetStream => 0,
            ContentType::TextUtf8 => 1,
            ContentType::Json => 2,
        }
    }
}

impl TryFrom<u8> for ContentType {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, CodecError> {
        match value {
            0 => Ok(ContentType::OctetStream),
            1 => Ok(ContentType::TextUtf8),
            2 => Ok(ContentType::Json),
            other => Err(CodecError::Malformed(format!(
                "unknown content type byte: {other}"
            ))),
        }
    }
}

/// One named opaque blob attached to a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDataEntry {
    /// ASCII entry name, e.g. `"ilp"` or `"auth_token"`.
    pub name: String,
    pub content_type: ContentType,
    pub data: Vec<u8>,
}

impl ProtocolDataEntry {
    pub fn new(name: impl Into<String>, content_type: ContentType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type,
            data: data.into(),
        }
    }
}

/// Ordered protocol-data list. Order is part of the wire encoding and
/// round-trips by position, not by key.
pub type ProtocolData = Vec<ProtocolDataEntry>;

/// Unsigned 64-bit amount with full precision at every boundary.
///
/// Shown and parsed as a decimal string; floating point is never involved,
/// so values beyond 2^53 survive round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(pub u64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        s.parse::<u64>()
            .map(Amount)
            .map_err(|_| CodecError::InvalidArgument(format!("invalid amount: {s:?}")))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A fixed 32-byte digest (execution condition or fulfillment).
///
/// URL-safe unpadded base64 at the text boundary, raw bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| CodecError::InvalidArgument(format!("invalid base64 digest: {s:?}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            CodecError::InvalidArgument(format!("digest must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Digest(bytes))
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Digest(bytes)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The structured fields of a protocol error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Three-character ASCII error code, e.g. `"F00"`.
    pub code: String,
    pub name: String,
    pub triggered_at: DateTime<Utc>,
    /// UTF-8 error data.
    pub data: String,
}

/// An error carried inside an ERROR or REJECT packet.
///
/// Structured generations decode the inner error fully; blob generations
/// pass the embedded error packet through as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnerError {
    Details(ErrorDetails),
    Opaque(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub inner: InnerError,
    pub protocol_data: ProtocolData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparePayload {
    pub transfer_id: Uuid,
    pub amount: Amount,
    pub execution_condition: Digest,
    pub expires_at: DateTime<Utc>,
    pub protocol_data: ProtocolData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillPayload {
    pub transfer_id: Uuid,
    pub fulfillment: Digest,
    pub protocol_data: ProtocolData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectPayload {
    pub transfer_id: Uuid,
    /// Version-dependent: alpha REJECT carries no rejection reason.
    pub rejection_reason: Option<InnerError>,
    pub protocol_data: ProtocolData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub amount: Amount,
    pub protocol_data: ProtocolData,
}

/// Typed payload — the closed tagged union behind every packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Ack(ProtocolData),
    Response(ProtocolData),
    Message(ProtocolData),
    Error(ErrorPayload),
    Prepare(PreparePayload),
    Fulfill(FulfillPayload),
    Reject(RejectPayload),
    Transfer(TransferPayload),
}

impl Payload {
    /// The logical type this payload belongs to.
    pub fn packet_type(&self) -> PacketType {
        match self {
            Payload::Ack(_) => PacketType::Ack,
            Payload::Response(_) => PacketType::Response,
            Payload::Message(_) => PacketType::Message,
            Payload::Error(_) => PacketType::Error,
            Payload::Prepare(_) => PacketType::Prepare,
            Payload::Fulfill(_) => PacketType::Fulfill,
            Payload::Reject(_) => PacketType::Reject,
            Payload::Transfer(_) => PacketType::Transfer,
        }
    }

    /// The protocol-data list attached to this payload.
    pub fn protocol_data(&self) -> &ProtocolData {
        match self {
            Payload::Ack(pd) | Payload::Response(pd) | Payload::Message(pd) => pd,
            Payload::Error(p) => &p.protocol_data,
            Payload::Prepare(p) => &p.protocol_data,
            Payload::Fulfill(p) => &p.protocol_data,
            Payload::Reject(p) => &p.protocol_data,
            Payload::Transfer(p) => &p.protocol_data,
        }
    }
}

/// The fields needed to build a PREPARE packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDescriptor {
    pub transfer_id: Uuid,
    pub amount: Amount,
    pub execution_condition: Digest,
    pub expires_at: DateTime<Utc>,
}

/// A complete packet: request correlation id plus typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub request_id: u32,
    pub payload: Payload,
}

impl Packet {
    pub fn new(request_id: u32, payload: Payload) -> Self {
        Self {
            request_id,
            payload,
        }
    }

    /// The logical type of this packet.
    pub fn packet_type(&self) -> PacketType {
        self.payload.packet_type()
    }

    pub fn ack(request_id: u32, protocol_data: ProtocolData) -> Self {
        Self::new(request_id, Payload::Ack(protocol_data))
    }

    pub fn response(request_id: u32, protocol_data: ProtocolData) -> Self {
        Self::new(request_id, Payload::Response(protocol_data))
    }

    pub fn message(request_id: u32, protocol_data: ProtocolData) -> Self {
        Self::new(request_id, Payload::Message(protocol_data))
    }

    pub fn error(request_id: u32, details: ErrorDetails, protocol_data: ProtocolData) -> Self {
        Self::new(
            request_id,
            Payload::Error(ErrorPayload {
                inner: InnerError::Details(details),
                protocol_data,
            }),
        )
    }

    pub fn prepare(
        request_id: u32,
        transfer: TransferDescriptor,
        protocol_data: ProtocolData,
    ) -> Self {
        Self::new(
            request_id,
            Payload::Prepare(PreparePayload {
                transfer_id: transfer.transfer_id,
                amount: transfer.amount,
                execution_condition: transfer.execution_condition,
                expires_at: transfer.expires_at,
                protocol_data,
            }),
        )
    }

    pub fn fulfill(
        request_id: u32,
        transfer_id: Uuid,
        fulfillment: Digest,
        protocol_data: ProtocolData,
    ) -> Self {
        Self::new(
            request_id,
            Payload::Fulfill(FulfillPayload {
                transfer_id,
                fulfillment,
                protocol_data,
            }),
        )
    }

    pub fn reject(
        request_id: u32,
        transfer_id: Uuid,
        rejection_reason: Option<InnerError>,
        protocol_data: ProtocolData,
    ) -> Self {
        Self::new(
            request_id,
            Payload::Reject(RejectPayload {
                transfer_id,
                rejection_reason,
                protocol_data,
            }),
        )
    }

    pub fn transfer(request_id: u32, amount: Amount, protocol_data: ProtocolData) -> Self {
        Self::new(
            request_id,
            Payload::Transfer(TransferPayload {
                amount,
                protocol_data,
            }),
        )
    }
}
