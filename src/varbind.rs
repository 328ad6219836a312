//! Variable binding (VarBind) type.
//!
//! A VarBind pairs an OID with a value.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::Result;
use crate::oid::Oid;
use crate::value::Value;

/// Variable binding - an OID-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    /// The object identifier.
    pub oid: Oid,
    /// The value.
    pub value: Value,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    /// Create a VarBind with a NULL value (for GET requests).
    pub fn null(oid: Oid) -> Self {
        Self {
            oid,
            value: Value::Null,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.value.encode(buf);
            buf.push_oid(&self.oid);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let oid = seq.read_oid()?;
        let value = Value::decode(&mut seq)?;
        seq.finish()?;
        Ok(VarBind { oid, value })
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// Encodes a list of VarBinds as a SEQUENCE of VarBind SEQUENCEs.
pub fn encode_varbind_list(buf: &mut EncodeBuf, varbinds: &[VarBind]) {
    buf.push_sequence(|buf| {
        // Reverse buffer: last element first
        for vb in varbinds.iter().rev() {
            vb.encode(buf);
        }
    });
}

/// Decodes a BER-encoded VarBind list.
pub fn decode_varbind_list(decoder: &mut Decoder) -> Result<Vec<VarBind>> {
    let mut seq = decoder.read_sequence()?;

    let mut varbinds = Vec::with_capacity((seq.remaining() / 16).max(1));
    while !seq.is_empty() {
        varbinds.push(VarBind::decode(&mut seq)?);
    }

    Ok(varbinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use bytes::Bytes;

    #[test]
    fn test_varbind_wire_format() {
        let mut buf = EncodeBuf::new();
        VarBind::null(oid!(1, 3, 6, 1)).encode(&mut buf);
        assert_eq!(
            buf.finish().as_ref(),
            &[0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00]
        );
    }

    #[test]
    fn test_varbind_list_keeps_order() {
        let varbinds = vec![
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("Linux")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(100)),
        ];

        let mut buf = EncodeBuf::new();
        encode_varbind_list(&mut buf, &varbinds);
        let mut decoder = Decoder::new(buf.finish());
        let decoded = decode_varbind_list(&mut decoder).unwrap();

        assert_eq!(varbinds, decoded);
    }

    #[test]
    fn test_empty_list() {
        let mut decoder = Decoder::from_slice(&[0x30, 0x00]);
        assert!(decode_varbind_list(&mut decoder).unwrap().is_empty());
    }

    #[test]
    fn test_varbind_with_extra_element_rejected() {
        // SEQUENCE { OID 1.3, NULL, NULL }
        let mut decoder = Decoder::from_slice(&[0x30, 0x07, 0x06, 0x01, 0x2B, 0x05, 0x00, 0x05, 0x00]);
        assert!(VarBind::decode(&mut decoder).is_err());
    }

    #[test]
    fn test_display() {
        let vb = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("edge-1"));
        assert_eq!(vb.to_string(), "1.3.6.1.2.1.1.5.0 = edge-1");
    }

    mod proptests {
        use super::*;
        use crate::oid::Oid;
        use proptest::prelude::*;

        fn arb_oid() -> impl Strategy<Value = Oid> {
            (0u32..3, 0u32..40, prop::collection::vec(any::<u32>(), 0..8)).prop_map(
                |(arc1, arc2, rest)| {
                    let mut arcs = vec![arc1, arc2];
                    arcs.extend(rest);
                    Oid::from_slice(&arcs)
                },
            )
        }

        fn arb_value() -> impl Strategy<Value = Value> {
            prop_oneof![
                any::<i32>().prop_map(Value::Integer),
                prop::collection::vec(any::<u8>(), 0..300)
                    .prop_map(|v| Value::OctetString(Bytes::from(v))),
                Just(Value::Null),
                arb_oid().prop_map(Value::ObjectIdentifier),
                any::<[u8; 4]>().prop_map(Value::IpAddress),
                any::<u32>().prop_map(Value::Counter32),
                any::<u32>().prop_map(Value::TimeTicks),
                any::<u64>().prop_map(Value::Counter64),
                Just(Value::NoSuchObject),
                Just(Value::EndOfMibView),
            ]
        }

        proptest! {
            #[test]
            fn list_decodes_to_what_was_encoded(
                varbinds in prop::collection::vec(
                    (arb_oid(), arb_value()).prop_map(|(o, v)| VarBind::new(o, v)),
                    0..12,
                )
            ) {
                let mut buf = EncodeBuf::new();
                encode_varbind_list(&mut buf, &varbinds);
                let mut decoder = Decoder::new(buf.finish());
                prop_assert_eq!(decode_varbind_list(&mut decoder).unwrap(), varbinds);
                prop_assert!(decoder.is_empty());
            }
        }
    }
}
