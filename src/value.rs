//! SNMP value types.
//!
//! The `Value` enum covers every SMI type a GetResponse can carry, including
//! the SNMPv2 exception values that bilingual agents sometimes return to v1
//! requests. Its `Display` impl is the text written into scan output.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Result};
use crate::oid::Oid;
use crate::util::encode_hex;
use bytes::Bytes;
use std::fmt;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (ASN.1 primitive, signed 32-bit)
    Integer(i32),

    /// OCTET STRING (arbitrary bytes).
    OctetString(Bytes),

    /// NULL
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, big-endian)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds)
    TimeTicks(u32),

    /// Opaque (legacy, arbitrary bytes)
    Opaque(Bytes),

    /// Counter64 (unsigned 64-bit, wrapping). Not part of SNMPv1, but
    /// bilingual agents return it anyway.
    Counter64(u64),

    /// noSuchObject exception.
    NoSuchObject,

    /// noSuchInstance exception.
    NoSuchInstance,

    /// endOfMibView exception.
    EndOfMibView,

    /// Unknown/unrecognized value type, kept verbatim.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => push_raw(buf, tag::application::OPAQUE, data),
            Value::Counter64(v) => buf.push_integer64(*v),
            Value::NoSuchObject => push_raw(buf, tag::context::NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => push_raw(buf, tag::context::NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => push_raw(buf, tag::context::END_OF_MIB_VIEW, &[]),
            Value::Unknown { tag: t, data } => push_raw(buf, *t, data),
        }
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_value(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(decoder.malformed(DecodeErrorKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Value::ObjectIdentifier(decoder.read_oid_value(len)?))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(
                        decoder.malformed(DecodeErrorKind::InvalidIpAddressLength { length: len })
                    );
                }
                let data = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([data[0], data[1], data[2], data[3]]))
            }
            tag::application::COUNTER32 => {
                Ok(Value::Counter32(decoder.read_unsigned32_value(len)?))
            }
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => {
                Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?))
            }
            tag::application::OPAQUE => Ok(Value::Opaque(decoder.read_bytes(len)?)),
            tag::application::COUNTER64 => {
                Ok(Value::Counter64(decoder.read_unsigned64_value(len)?))
            }
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            // Net-snmp documents but does not parse the constructed form; neither do we.
            tag::universal::OCTET_STRING_CONSTRUCTED => {
                Err(decoder.malformed(DecodeErrorKind::ConstructedOctetString))
            }
            _ => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag, data })
            }
        }
    }
}

fn push_raw(buf: &mut EncodeBuf, tag: u8, data: &[u8]) {
    buf.push_bytes(data);
    buf.push_length(data.len());
    buf.push_tag(tag);
}

/// Text shown for an OCTET STRING: the string itself when it is UTF-8
/// without control characters (tab, CR and LF allowed), hex otherwise.
fn printable_text(data: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(data).ok()?;
    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\r' | '\n'))
        .then_some(text)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => match printable_text(data) {
                Some(text) => f.write_str(text),
                None => write!(f, "0x{}", encode_hex(data)),
            },
            Value::Null => Ok(()),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])
            }
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => write!(f, "{}", v),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::Opaque(data) | Value::Unknown { data, .. } => {
                write!(f, "0x{}", encode_hex(data))
            }
            Value::NoSuchObject => f.write_str("No Such Object currently exists at this OID"),
            Value::NoSuchInstance => f.write_str("No Such Instance currently exists at this OID"),
            Value::EndOfMibView => f.write_str("No more variables left in this MIB View"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn decode(bytes: &'static [u8]) -> Result<Value> {
        Value::decode(&mut Decoder::new(Bytes::from_static(bytes)))
    }

    #[test]
    fn reject_constructed_octet_string() {
        // Constructed OCTET STRING containing primitive OCTET STRING "A"
        assert!(decode(&[0x24, 0x03, 0x04, 0x01, 0x41]).is_err());
    }

    #[test]
    fn decode_application_types() {
        assert_eq!(
            decode(&[0x40, 0x04, 192, 168, 1, 1]).unwrap(),
            Value::IpAddress([192, 168, 1, 1])
        );
        assert_eq!(
            decode(&[0x41, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap(),
            Value::Counter32(u32::MAX)
        );
        assert_eq!(
            decode(&[0x43, 0x03, 0x01, 0xE2, 0x40]).unwrap(),
            Value::TimeTicks(123_456)
        );
        assert_eq!(
            decode(&[0x46, 0x05, 0x02, 0x54, 0x0B, 0xE4, 0x00]).unwrap(),
            Value::Counter64(10_000_000_000)
        );
    }

    #[test]
    fn decode_exceptions_and_unknown() {
        assert_eq!(decode(&[0x80, 0x00]).unwrap(), Value::NoSuchObject);
        assert_eq!(decode(&[0x81, 0x00]).unwrap(), Value::NoSuchInstance);
        assert_eq!(decode(&[0x82, 0x00]).unwrap(), Value::EndOfMibView);
        assert_eq!(
            decode(&[0x47, 0x02, 0xAB, 0xCD]).unwrap(),
            Value::Unknown {
                tag: 0x47,
                data: Bytes::from_static(&[0xAB, 0xCD])
            }
        );
    }

    #[test]
    fn decode_rejects_bad_lengths() {
        assert!(decode(&[0x40, 0x03, 1, 2, 3]).is_err());
        assert!(decode(&[0x05, 0x01, 0x00]).is_err());
        assert!(decode(&[0x02, 0x00]).is_err());
    }

    #[test]
    fn encode_matches_decode() {
        let values = [
            Value::Integer(-42),
            Value::OctetString(Bytes::from_static(b"router-1")),
            Value::Null,
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 9)),
            Value::Gauge32(1_000_000_000),
            Value::Opaque(Bytes::from_static(&[0x9F, 0x78, 0x04])),
            Value::NoSuchInstance,
        ];
        for value in values {
            let mut buf = EncodeBuf::new();
            value.encode(&mut buf);
            let mut decoder = Decoder::new(buf.finish());
            assert_eq!(Value::decode(&mut decoder).unwrap(), value);
            assert!(decoder.is_empty());
        }
    }

    #[test]
    fn display_numbers_and_addresses() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Counter32(42).to_string(), "42");
        assert_eq!(Value::TimeTicks(360_000).to_string(), "360000");
        assert_eq!(Value::Counter64(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Value::IpAddress([10, 0, 0, 254]).to_string(), "10.0.0.254");
        assert_eq!(
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072)).to_string(),
            "1.3.6.1.4.1.8072"
        );
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn display_octet_strings() {
        assert_eq!(Value::from("Linux router1 5.4.0").to_string(), "Linux router1 5.4.0");
        assert_eq!(Value::from("line1\r\nline2").to_string(), "line1\r\nline2");
        assert_eq!(Value::from("héllo").to_string(), "héllo");
        // MAC address
        let mac = Value::OctetString(Bytes::from_static(&[0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]));
        assert_eq!(mac.to_string(), "0x001a2b3c4d5e");
        // Valid UTF-8 but with a control character
        let bell = Value::OctetString(Bytes::from_static(b"ab\x07"));
        assert_eq!(bell.to_string(), "0x616207");
        assert_eq!(Value::OctetString(Bytes::new()).to_string(), "");
    }

    #[test]
    fn display_exceptions() {
        assert_eq!(
            Value::NoSuchObject.to_string(),
            "No Such Object currently exists at this OID"
        );
        assert_eq!(
            Value::NoSuchInstance.to_string(),
            "No Such Instance currently exists at this OID"
        );
        assert_eq!(
            Value::EndOfMibView.to_string(),
            "No more variables left in this MIB View"
        );
    }
}
