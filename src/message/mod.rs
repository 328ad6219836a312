//! SNMP message wrappers.
//!
//! A message wraps a PDU with the protocol version and the community string:
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`.

mod community;

pub use community::CommunityMessage;
