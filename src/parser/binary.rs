use nom::{
    bytes::streaming::take,
    combinator::map,
    number::streaming::{be_u16, be_u32, be_u64, be_u8},
    sequence::tuple,
    IResult,
};

use super::{Response, ResponseHeader, HEADER_LEN, RESPONSE_MAGIC};
use crate::error::ProtocolError;

fn parse_binary_header(buf: &[u8]) -> IResult<&[u8], ResponseHeader> {
    map(
        tuple((
            be_u8, be_u8, be_u16, be_u8, be_u8, be_u16, be_u32, be_u32, be_u64,
        )),
        |(
            magic,
            opcode,
            key_length,
            extras_length,
            data_type,
            status,
            total_body_length,
            opaque,
            cas,
        )| ResponseHeader {
            magic,
            opcode,
            key_length,
            extras_length,
            data_type,
            status,
            total_body_length,
            opaque,
            cas,
        },
    )(buf)
}

fn parse_binary_body(
    buf: &[u8],
    header: ResponseHeader,
) -> IResult<&[u8], (&[u8], &[u8], &[u8])> {
    tuple((
        take(header.extras_length as usize),
        take(header.key_length as usize),
        take(header.value_length()),
    ))(buf)
}

fn validate_header(header: &ResponseHeader) -> Result<(), ProtocolError> {
    if header.magic != RESPONSE_MAGIC {
        return Err(ProtocolError::InvalidMagic(header.magic));
    }

    let declared = header.extras_length as u32 + header.key_length as u32;
    if header.total_body_length < declared {
        return Err(ProtocolError::BodyLengthMismatch {
            total: header.total_body_length,
            extras: header.extras_length,
            key: header.key_length,
        });
    }

    Ok(())
}

/// Total length of the frame at the front of `buf`, once its header has arrived.
pub fn frame_length(buf: &[u8]) -> Option<usize> {
    parse_binary_header(buf)
        .ok()
        .map(|(_, header)| HEADER_LEN + header.total_body_length as usize)
}

/// Attempts to decode one response frame from the front of `buf`.
///
/// Returns `Ok(None)` until every byte the header declares has been buffered, and
/// `Ok(Some((consumed, response)))` once a complete frame is available.
pub fn parse_binary_response(buf: &[u8]) -> Result<Option<(usize, Response)>, ProtocolError> {
    let (rest, header) = match parse_binary_header(buf) {
        Ok(parsed) => parsed,
        Err(nom::Err::Incomplete(_)) => return Ok(None),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => return Err(e.code.into()),
    };

    validate_header(&header)?;

    match parse_binary_body(rest, header) {
        Ok((_, (extras, key, value))) => Ok(Some((
            HEADER_LEN + header.total_body_length as usize,
            Response {
                header,
                extras: extras.to_vec(),
                key: key.to_vec(),
                value: value.to_vec(),
            },
        ))),
        Err(nom::Err::Incomplete(_)) => Ok(None),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.code.into()),
    }
}
