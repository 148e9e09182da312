//! # Per-Type Payload Codecs
//!
//! A closed dispatch over the payload variant. Fields are written in a
//! fixed order with no padding; decoders read the same order and tolerate
//! trailing unread bytes inside the payload body (historical leniency,
//! preserved for forward compatibility).
//!
//! | Type                 | Payload fields                                             |
//! |----------------------|------------------------------------------------------------|
//! | ACK/RESPONSE/MESSAGE | protocolData                                               |
//! | ERROR                | code + name + triggeredAt + data + protocolData, or an     |
//! |                      | embedded inner packet + protocolData (version-dependent)   |
//! | PREPARE              | transferId + amount + condition + expiresAt + protocolData |
//! | FULFILL              | transferId + fulfillment + protocolData                    |
//! | REJECT               | transferId + rejectionReason? + protocolData               |
//! | TRANSFER             | amount + protocolData                                      |

use crate::codec::fields;
use crate::codec::side_data;
use crate::error::{CodecError, Result};
use crate::names::NameTable;
use crate::oer::{Reader, Writer};
use crate::packet::{
    ErrorDetails, ErrorPayload, FulfillPayload, InnerError, PacketType, Payload, PreparePayload,
    ProtocolData, RejectPayload, TransferPayload,
};
use crate::version::VersionConfig;

fn write_protocol_data(
    writer: &mut Writer,
    entries: &ProtocolData,
    config: &VersionConfig,
    names: &NameTable,
) -> Result<()> {
    if config.keyed_side_data {
        side_data::write_side_data_keyed(writer, entries, names)
    } else {
        side_data::write_protocol_data(writer, entries, names)
    }
}

fn read_protocol_data(reader: &mut Reader<'_>, config: &VersionConfig) -> Result<ProtocolData> {
    if config.keyed_side_data {
        side_data::read_side_data_keyed(reader)
    } else {
        side_data::read_protocol_data(reader)
    }
}

fn write_error_details(writer: &mut Writer, details: &ErrorDetails) -> Result<()> {
    if details.code.len() != 3 || !details.code.is_ascii() {
        return Err(CodecError::InvalidErrorCode(details.code.clone()));
    }
    writer.write_bytes(details.code.as_bytes());
    writer.write_var_octet_string(details.name.as_bytes());
    fields::write_generalized_time(writer, &details.triggered_at);
    writer.write_var_octet_string(details.data.as_bytes());
    Ok(())
}

fn read_error_details(reader: &mut Reader<'_>) -> Result<ErrorDetails> {
    let code = reader.read_bytes(3)?;
    let code = std::str::from_utf8(code)
        .ok()
        .filter(|c| c.is_ascii())
        .ok_or_else(|| CodecError::Malformed("non-ASCII error code".into()))?
        .to_owned();
    let name = String::from_utf8(reader.read_var_octet_string()?.to_vec())
        .map_err(|_| CodecError::Malformed("non-UTF-8 error name".into()))?;
    let triggered_at = fields::read_generalized_time(reader)?;
    let data = String::from_utf8(reader.read_var_octet_string()?.to_vec())
        .map_err(|_| CodecError::Malformed("non-UTF-8 error data".into()))?;
    Ok(ErrorDetails {
        code,
        name,
        triggered_at,
        data,
    })
}

/// Write an inner error as an embedded sub-packet:
/// `[error type byte][payload as var-octet-string]`.
fn write_embedded_error(
    writer: &mut Writer,
    inner: &InnerError,
    config: &VersionConfig,
) -> Result<()> {
    match inner {
        // Pass an already-framed error packet through untouched.
        InnerError::Opaque(blob) => {
            writer.write_bytes(blob);
            Ok(())
        }
        InnerError::Details(details) => {
            let error_type = config
                .wire_code(PacketType::Error)
                .ok_or_else(|| CodecError::InvalidArgument("version defines no ERROR type".into()))?;
            let mut inner_writer = Writer::new();
            write_error_details(&mut inner_writer, details)?;
            write_protocol_data(&mut inner_writer, &Vec::new(), config, NameTable::common())?;
            writer.write_u8(error_type);
            writer.write_var_octet_string(inner_writer.as_slice());
            Ok(())
        }
    }
}

/// Read an inner error: structured generations decode the embedded error
/// packet, blob generations capture it verbatim.
fn read_embedded_error(reader: &mut Reader<'_>, config: &VersionConfig) -> Result<InnerError> {
    if config.structured_inner_error {
        let type_byte = reader.read_u8()?;
        if config.packet_type(type_byte) != Some(PacketType::Error) {
            return Err(CodecError::UnrecognizedType(type_byte));
        }
        let payload = reader.read_var_octet_string()?;
        let mut inner_reader = Reader::new(payload);
        let details = read_error_details(&mut inner_reader)?;
        Ok(InnerError::Details(details))
    } else {
        Ok(InnerError::Opaque(
            fields::read_embedded_packet(reader)?.to_vec(),
        ))
    }
}

/// Encode a payload body (everything inside the envelope's octet string).
pub fn write_payload(
    writer: &mut Writer,
    payload: &Payload,
    config: &VersionConfig,
    names: &NameTable,
) -> Result<()> {
    match payload {
        Payload::Ack(pd) | Payload::Response(pd) | Payload::Message(pd) => {
            write_protocol_data(writer, pd, config, names)
        }
        Payload::Error(error) => {
            match (&error.inner, config.structured_inner_error) {
                (InnerError::Details(details), true) => write_error_details(writer, details)?,
                (InnerError::Opaque(_), false) => {
                    write_embedded_error(writer, &error.inner, config)?
                }
                (InnerError::Details(_), false) => {
                    return Err(CodecError::InvalidArgument(
                        "this generation embeds errors as opaque packets; \
                         supply InnerError::Opaque"
                            .into(),
                    ))
                }
                (InnerError::Opaque(_), true) => {
                    return Err(CodecError::InvalidArgument(
                        "this generation encodes errors structurally; \
                         supply InnerError::Details"
                            .into(),
                    ))
                }
            }
            write_protocol_data(writer, &error.protocol_data, config, names)
        }
        Payload::Prepare(prepare) => {
            fields::write_transfer_id(writer, prepare.transfer_id);
            fields::write_amount(writer, prepare.amount, config);
            fields::write_digest(writer, prepare.execution_condition);
            fields::write_generalized_time(writer, &prepare.expires_at);
            write_protocol_data(writer, &prepare.protocol_data, config, names)
        }
        Payload::Fulfill(fulfill) => {
            fields::write_transfer_id(writer, fulfill.transfer_id);
            fields::write_digest(writer, fulfill.fulfillment);
            write_protocol_data(writer, &fulfill.protocol_data, config, names)
        }
        Payload::Reject(reject) => {
            fields::write_transfer_id(writer, reject.transfer_id);
            match (&reject.rejection_reason, config.reject_has_reason) {
                (Some(reason), true) => write_embedded_error(writer, reason, config)?,
                (None, false) => {}
                (None, true) => {
                    return Err(CodecError::InvalidArgument(
                        "this generation requires a rejection reason".into(),
                    ))
                }
                (Some(_), false) => {
                    return Err(CodecError::InvalidArgument(
                        "this generation carries no rejection reason".into(),
                    ))
                }
            }
            write_protocol_data(writer, &reject.protocol_data, config, names)
        }
        Payload::Transfer(transfer) => {
            fields::write_amount(writer, transfer.amount, config);
            write_protocol_data(writer, &transfer.protocol_data, config, names)
        }
    }
}

/// Decode a payload body for an already-resolved logical type.
pub fn read_payload(
    payload: &[u8],
    packet_type: PacketType,
    config: &VersionConfig,
) -> Result<Payload> {
    let mut reader = Reader::new(payload);
    let payload = match packet_type {
        PacketType::Ack => Payload::Ack(read_protocol_data(&mut reader, config)?),
        PacketType::Response => Payload::Response(read_protocol_data(&mut reader, config)?),
        PacketType::Message => Payload::Message(read_protocol_data(&mut reader, config)?),
        PacketType::Error => {
            let inner = if config.structured_inner_error {
                InnerError::Details(read_error_details(&mut reader)?)
            } else {
                InnerError::Opaque(fields::read_embedded_packet(&mut reader)?.to_vec())
            };
            let protocol_data = read_protocol_data(&mut reader, config)?;
            Payload::Error(ErrorPayload {
                inner,
                protocol_data,
            })
        }
        PacketType::Prepare => Payload::Prepare(PreparePayload {
            transfer_id: fields::read_transfer_id(&mut reader)?,
            amount: fields::read_amount(&mut reader, config)?,
            execution_condition: fields::read_digest(&mut reader)?,
            expires_at: fields::read_generalized_time(&mut reader)?,
            protocol_data: read_protocol_data(&mut reader, config)?,
        }),
        PacketType::Fulfill => Payload::Fulfill(FulfillPayload {
            transfer_id: fields::read_transfer_id(&mut reader)?,
            fulfillment: fields::read_digest(&mut reader)?,
            protocol_data: read_protocol_data(&mut reader, config)?,
        }),
        PacketType::Reject => {
            let transfer_id = fields::read_transfer_id(&mut reader)?;
            let rejection_reason = if config.reject_has_reason {
                Some(read_embedded_error(&mut reader, config)?)
            } else {
                None
            };
            let protocol_data = read_protocol_data(&mut reader, config)?;
            Payload::Reject(RejectPayload {
                transfer_id,
                rejection_reason,
                protocol_data,
            })
        }
        PacketType::Transfer => Payload::Transfer(TransferPayload {
            amount: fields::read_amount(&mut reader, config)?,
            protocol_data: read_protocol_data(&mut reader, config)?,
        }),
    };
    // Trailing unread bytes inside the payload body are tolerated.
    Ok(payload)
}
