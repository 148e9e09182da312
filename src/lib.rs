//! # BTP Codec
//!
//! Binary packet codec for a small bilateral financial-messaging protocol.
//!
//! This crate converts between an in-memory [`Packet`] representation and a
//! compact octet-encoded wire format: fixed-width big-endian integers,
//! length-prefixed variable octet strings, and a protocol-specific
//! variable-width count prefix for repeated protocol-data entries.
//!
//! ## Scope
//! Pure transform only. No transport, no RPC semantics, no I/O: callers
//! hand in bytes or packets and get the other back, synchronously. Every
//! operation is stateless and safe to call from any number of threads.
//!
//! ## Wire Format
//! ```text
//! [type: 1] [requestId: 4, big-endian] [payload: var-octet-string]
//! ```
//!
//! ## Versions
//! Four protocol generations are supported — alpha, v1, v1.1, and the
//! sibling ledger protocol — selected per call via
//! [`ProtocolVersion`]; the version-less entry points use
//! [`ProtocolVersion::LATEST`]. See [`version`] for what differs between
//! generations.
//!
//! ## Example
//! ```rust
//! use btp_codec::{ContentType, Packet, ProtocolDataEntry};
//!
//! let packet = Packet::message(
//!     1,
//!     vec![ProtocolDataEntry::new(
//!         "ilp",
//!         ContentType::OctetStream,
//!         Vec::new(),
//!     )],
//! );
//!
//! let bytes = packet.to_bytes()?;
//! let decoded = Packet::from_bytes(&bytes)?;
//! assert_eq!(decoded, packet);
//! # Ok::<(), btp_codec::CodecError>(())
//! ```

pub mod codec;
pub mod error;
pub mod names;
pub mod oer;
pub mod packet;
pub mod version;

pub use codec::{
    deserialize, deserialize_versioned, serialize, serialize_error, serialize_fulfill,
    serialize_message, serialize_prepare, serialize_reject, serialize_response, serialize_transfer,
    serialize_versioned, serialize_with_table,
};
pub use error::{CodecError, Result};
pub use names::NameTable;
pub use packet::{
    Amount, ContentType, Digest, ErrorDetails, ErrorPayload, FulfillPayload, InnerError, Packet,
    PacketType, Payload, PreparePayload, ProtocolData, ProtocolDataEntry, RejectPayload,
    TransferDescriptor, TransferPayload,
};
pub use version::{ProtocolVersion, TypeNumbering, VersionConfig};
