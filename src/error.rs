//! # Error Types
//!
//! Error handling for the packet codec.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding packets. Every failure is terminal and non-retryable: decoding
//! either yields a complete [`Packet`](crate::Packet) or fails atomically,
//! with no partial results.
//!
//! ## Error Categories
//! - **Truncated**: the buffer ends before a field is complete
//! - **Malformed**: a structurally invalid encoding (bad length prefix,
//!   unparseable timestamp, non-ASCII name, unknown content type)
//! - **InvalidErrorCode**: an error code that is not exactly 3 ASCII
//!   characters, rejected at encode time
//! - **UnrecognizedType**: a type byte outside the active version's set
//! - **InvalidArgument**: a caller-supplied value that cannot be encoded
//!
//! All errors implement `std::error::Error` for interoperability.

use thiserror::Error;

/// CodecError is the primary error type for all encode/decode operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unexpected end of buffer: {0} more byte(s) required")]
    Truncated(usize),

    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("error code must be exactly 3 ASCII characters, got {0:?}")]
    InvalidErrorCode(String),

    #[error("unrecognized packet type byte: {0}")]
    UnrecognizedType(u8),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
