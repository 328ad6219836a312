//! SNMP protocol version.

/// SNMP version carried in community-based messages.
///
/// The scanner always sends v1; v2c is accepted on responses because
/// bilingual agents sometimes echo the wrong version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    #[default]
    V1,
    /// SNMPv2c (RFC 3416)
    V2c,
}

impl Version {
    /// The version number as encoded on the wire.
    pub fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    /// Create from the wire version number.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "v1"),
            Version::V2c => write!(f, "v2c"),
        }
    }
}
