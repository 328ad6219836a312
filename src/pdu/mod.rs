//! SNMP Protocol Data Units (PDUs).
//!
//! Only the request/response shape is modelled: the scanner sends
//! GetRequests and reads Responses.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    Response = 0xA2,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA2 => Some(Self::Response),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::Response => write!(f, "Response"),
        }
    }
}

/// Generic PDU structure for request/response operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (0 for requests, error code for responses)
    pub error_status: i32,
    /// Error index (1-based index of problematic varbind)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a new GET request PDU.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Create a successful Response PDU.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(tag)
            .ok_or_else(|| decoder.malformed(DecodeErrorKind::UnknownPduType(tag)))?;

        let len = decoder.read_length()?;
        let mut pdu_decoder = decoder.sub_decoder(len)?;

        let request_id = pdu_decoder.read_integer()?;
        let error_status = pdu_decoder.read_integer()?;
        let error_index = pdu_decoder.read_integer()?;
        let varbinds = decode_varbind_list(&mut pdu_decoder)?;
        pdu_decoder.finish()?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// The OID of the varbind blamed by `error_index`.
    ///
    /// The index is 1-based; zero, negative and out-of-range indexes yield
    /// `None`.
    pub fn error_oid(&self) -> Option<&Oid> {
        usize::try_from(self.error_index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.varbinds.get(i))
            .map(|vb| &vb.oid)
    }

    /// Create a Response PDU with specific error status, echoing the
    /// request varbinds.
    pub fn to_error_response(&self, error_status: ErrorStatus, error_index: i32) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id: self.request_id,
            error_status: error_status.as_i32(),
            error_index,
            varbinds: self.varbinds.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    fn three_oid_request() -> Pdu {
        Pdu::get_request(
            7,
            &[
                oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
                oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
                oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
            ],
        )
    }

    #[test]
    fn get_request_wire_format() {
        let pdu = Pdu::get_request(1, &[oid!(1, 3, 6, 1)]);
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        assert_eq!(
            buf.finish().as_ref(),
            &[
                0xA0, 0x14, // GetRequest
                0x02, 0x01, 0x01, // request-id 1
                0x02, 0x01, 0x00, // error-status 0
                0x02, 0x01, 0x00, // error-index 0
                0x30, 0x09, 0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00,
            ]
        );
    }

    #[test]
    fn response_decodes() {
        let pdu = Pdu::response(
            99,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("sw1"))],
        );
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        let decoded = Pdu::decode(&mut Decoder::new(buf.finish())).unwrap();
        assert_eq!(decoded, pdu);
        assert!(!decoded.is_error());
    }

    #[test]
    fn unknown_pdu_tag_rejected() {
        // Trap-v1 is not something a GET ever gets back.
        let mut decoder = Decoder::from_slice(&[0xA4, 0x00]);
        assert!(Pdu::decode(&mut decoder).is_err());
    }

    #[test]
    fn only_get_and_response_tags_are_known() {
        assert_eq!(PduType::from_tag(0xA0), Some(PduType::GetRequest));
        assert_eq!(PduType::from_tag(0xA2), Some(PduType::Response));
        for tag in [0xA1, 0xA3, 0xA5, 0xA7] {
            assert_eq!(PduType::from_tag(tag), None, "{tag:#x}");
        }
    }

    #[test]
    fn error_oid_points_at_blamed_varbind() {
        let request = three_oid_request();
        let response = request.to_error_response(ErrorStatus::NoSuchName, 2);
        assert!(response.is_error());
        assert_eq!(response.error_status_enum(), ErrorStatus::NoSuchName);
        assert_eq!(response.error_oid(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));
    }

    #[test]
    fn error_oid_out_of_range() {
        let request = three_oid_request();
        for index in [0, -1, 4, i32::MAX] {
            let response = request.to_error_response(ErrorStatus::GenErr, index);
            assert_eq!(response.error_oid(), None, "index {index}");
        }
    }
}
