//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an OID from arc values.
    ///
    /// No validation happens here; see [`validate`](Self::validate).
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse and validate an OID in dotted-decimal notation.
    ///
    /// A single leading dot is accepted (`.1.3.6.1` is the form net-snmp
    /// prints). Empty arcs, signs and values above `u32::MAX` are rejected,
    /// and the result must pass [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_scan::oid::Oid;
    ///
    /// let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
    /// assert_eq!(Oid::parse(".1.3.6.1").unwrap().to_string(), "1.3.6.1");
    ///
    /// assert!(Oid::parse("1..3").is_err());
    /// assert!(Oid::parse("3.0").is_err());
    /// assert!(Oid::parse("1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }

        let arcs = body
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u32>().ok()
            })
            .collect::<Option<SmallVec<[u32; 16]>>>()
            .ok_or_else(|| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;

        let oid = Self { arcs };
        oid.validate().map_err(|err| match *err {
            Error::InvalidOid { kind, .. } => Error::invalid_oid_with_input(kind, s),
            other => other.boxed(),
        })?;
        Ok(oid)
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Whether the OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Validate that the OID can be sent on the wire.
    ///
    /// X.690 Section 8.19.4: the first arc is 0, 1 or 2, and the second arc
    /// is at most 39 when the first is 0 or 1. An OID also needs at least two
    /// arcs and at most [`MAX_OID_LEN`].
    pub fn validate(&self) -> Result<()> {
        let (first, second) = match self.arcs.as_slice() {
            [] => return Err(Error::invalid_oid(OidErrorKind::Empty)),
            [_] => return Err(Error::invalid_oid(OidErrorKind::TooShort)),
            [first, second, ..] => (*first, *second),
        };

        if first > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(first)));
        }
        if first < 2 && second >= 40 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first,
                second,
            }));
        }
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        Ok(())
    }

    /// Encode the OID content octets (X.690 Section 8.19).
    ///
    /// The first two arcs share one subidentifier, `arc1 * 40 + arc2`; the
    /// rest are base-128 with continuation bits.
    pub fn to_ber(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        match self.arcs.as_slice() {
            [] => {}
            [first] => encode_subidentifier(&mut bytes, u64::from(*first) * 40),
            [first, second, rest @ ..] => {
                encode_subidentifier(&mut bytes, u64::from(*first) * 40 + u64::from(*second));
                for &arc in rest {
                    encode_subidentifier(&mut bytes, u64::from(arc));
                }
            }
        }

        bytes
    }

    /// Decode OID content octets.
    pub fn from_ber(data: &[u8]) -> std::result::Result<Self, DecodeErrorKind> {
        if data.is_empty() {
            return Err(DecodeErrorKind::InvalidOidEncoding);
        }

        let mut arcs = SmallVec::new();

        let (first_subid, mut i) = decode_subidentifier(data)?;
        match first_subid {
            0..40 => arcs.extend([0, first_subid]),
            40..80 => arcs.extend([1, first_subid - 40]),
            _ => arcs.extend([2, first_subid - 80]),
        }

        while i < data.len() {
            let (arc, consumed) = decode_subidentifier(&data[i..])?;
            arcs.push(arc);
            i += consumed;

            if arcs.len() > MAX_OID_LEN {
                return Err(DecodeErrorKind::InvalidOidEncoding);
            }
        }

        Ok(Self { arcs })
    }
}

fn encode_subidentifier(bytes: &mut SmallVec<[u8; 64]>, value: u64) {
    let groups = (64 - value.leading_zeros()).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode one subidentifier, returning (value, bytes consumed).
fn decode_subidentifier(data: &[u8]) -> std::result::Result<(u32, usize), DecodeErrorKind> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return Err(DecodeErrorKind::InvalidOidEncoding);
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DecodeErrorKind::TruncatedData)
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Build an [`Oid`] from literal arcs.
///
/// ```
/// use snmp_scan::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
