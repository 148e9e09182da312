//! # Version Dispatch
//!
//! Four incompatible protocol generations share this codec. Everything that
//! differs between them is captured in a [`VersionConfig`] resolved from a
//! [`ProtocolVersion`] and passed explicitly through the codec — there is no
//! ambient version state.
//!
//! ## Generations
//! - **Alpha**: the original numbering (ACK exists, type codes one higher
//!   than v1), inner errors passed through as opaque blobs, REJECT carries
//!   no rejection reason.
//! - **V1**: ACK removed, every type code shifted down by one, inner errors
//!   decoded structurally.
//! - **V1.1**: V1 plus the TRANSFER type.
//! - **Ledger**: the sibling protocol with its own
//!   ERROR/PREPARE/FULFILL/REJECT-oriented numbering and keyed single-byte
//!   side data.

use serde::{Deserialize, Serialize};

use crate::packet::PacketType;

/// A supported protocol generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProtocolVersion {
    Alpha,
    V1,
    #[default]
    V1_1,
    Ledger,
}

impl ProtocolVersion {
    /// The latest stable generation, used by the version-less entry points.
    pub const LATEST: ProtocolVersion = ProtocolVersion::V1_1;

    /// Resolve the full rule set for this generation.
    pub fn config(self) -> VersionConfig {
        match self {
            ProtocolVersion::Alpha => VersionConfig {
                version: self,
                numbering: TypeNumbering::Offset(0),
                has_ack: true,
                has_transfer: false,
                structured_inner_error: false,
                reject_has_reason: false,
                keyed_side_data: false,
                amount_as_word_pair: true,
            },
            ProtocolVersion::V1 => VersionConfig {
                version: self,
                numbering: TypeNumbering::Offset(1),
                has_ack: false,
                has_transfer: false,
                structured_inner_error: true,
                reject_has_reason: true,
                keyed_side_data: false,
                amount_as_word_pair: false,
            },
            ProtocolVersion::V1_1 => VersionConfig {
                version: self,
                numbering: TypeNumbering::Offset(1),
                has_ack: false,
                has_transfer: true,
                structured_inner_error: true,
                reject_has_reason: true,
                keyed_side_data: false,
                amount_as_word_pair: false,
            },
            ProtocolVersion::Ledger => VersionConfig {
                version: self,
                numbering: TypeNumbering::Ledger,
                has_ack: false,
                has_transfer: false,
                structured_inner_error: true,
                reject_has_reason: true,
                keyed_side_data: true,
                amount_as_word_pair: false,
            },
        }
    }
}

/// How a generation numbers its packet types on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeNumbering {
    /// Wire byte = canonical code minus this constant. The canonical codes
    /// are the alpha ones (ACK = 1 through TRANSFER = 8).
    Offset(u8),
    /// The sibling ledger protocol's own table.
    Ledger,
}

/// The complete rule set for one protocol generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionConfig {
    pub version: ProtocolVersion,
    pub numbering: TypeNumbering,
    /// ACK exists only in alpha.
    pub has_ack: bool,
    /// TRANSFER exists only in v1.1.
    pub has_transfer: bool,
    /// Whether ERROR/REJECT inner errors are decoded structurally rather
    /// than passed through as opaque embedded packets.
    pub structured_inner_error: bool,
    /// Whether REJECT carries a rejection reason at all.
    pub reject_has_reason: bool,
    /// Whether side data uses the keyed single-byte-count encoding instead
    /// of the ordered-list encoding.
    pub keyed_side_data: bool,
    /// Whether amounts are handled as a (hi, lo) pair of 32-bit words.
    /// Byte-identical to the plain 64-bit form; alpha only.
    pub amount_as_word_pair: bool,
}

/// Canonical (alpha) code for a logical type.
fn canonical_code(packet_type: PacketType) -> u8 {
    match packet_type {
        PacketType::Ack => 1,
        PacketType::Response => 2,
        PacketType::Error => 3,
        PacketType::Prepare => 4,
        PacketType::Fulfill => 5,
        PacketType::Reject => 6,
        PacketType::Message => 7,
        PacketType::Transfer => 8,
    }
}

impl VersionConfig {
    /// The wire byte for a logical type, or `None` when this generation
    /// does not define the type.
    pub fn wire_code(&self, packet_type: PacketType) -> Option<u8> {
        if packet_type == PacketType::Ack && !self.has_ack {
            return None;
        }
        if packet_type == PacketType::Transfer && !self.has_transfer {
            return None;
        }
        match self.numbering {
            TypeNumbering::Offset(offset) => Some(canonical_code(packet_type) - offset),
            TypeNumbering::Ledger => match packet_type {
                PacketType::Error => Some(1),
                PacketType::Prepare => Some(2),
                PacketType::Fulfill => Some(3),
                PacketType::Reject => Some(4),
                PacketType::Response => Some(5),
                PacketType::Message => Some(6),
                PacketType::Ack | PacketType::Transfer => None,
            },
        }
    }

    /// The logical type for a wire byte, or `None` when the byte is outside
    /// this generation's set.
    pub fn packet_type(&self, byte: u8) -> Option<PacketType> {
        const ALL: [PacketType; 8] = [
            PacketType::Ack,
            PacketType::Response,
            PacketType::Error,
            PacketType::Prepare,
            PacketType::Fulfill,
            PacketType::Reject,
            PacketType::Message,
            PacketType::Transfer,
        ];
        ALL.into_iter()
            .find(|&t| self.wire_code(t) == Some(byte))
    }
}
