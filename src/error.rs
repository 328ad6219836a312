//! Error types for snmp-scan.
//!
//! - [`Error`] - every failure the crate can report, from socket errors to
//!   unreadable input files
//! - [`ErrorStatus`] - SNMP protocol errors returned by agents (RFC 1157 / RFC 3416)
//! - [`DecodeErrorKind`] / [`OidErrorKind`] - detail for malformed data
//!
//! Results are boxed: `Result<T> = Result<T, Box<Error>>`, which keeps the
//! happy path pointer-sized.
//!
//! The `Display` text of the per-device variants (`Io`, `Timeout`, `Resolve`,
//! `InvalidDevice`, `Snmp`, `MalformedResponse`) is exactly what ends up in a device's
//! `"Error"` field of the scan output.
//!
//! ```
//! use snmp_scan::{Error, ErrorStatus, oid};
//!
//! let err = Error::Snmp {
//!     target: None,
//!     status: ErrorStatus::NoSuchName,
//!     index: 1,
//!     oid: Some(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
//! };
//! assert_eq!(err.to_string(), "noSuchName at 1.3.6.1.2.1.1.1.0");
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::oid::Oid;

/// Result type alias using the crate's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// The main error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Socket-level failure (bind, connect, send, ICMP unreachable on receive).
    #[error("{source}")]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// No response arrived within the request timeout.
    #[error("No SNMP response received before timeout")]
    Timeout {
        target: Option<SocketAddr>,
        elapsed: Duration,
        request_id: i32,
    },

    /// The device address could not be resolved to a socket address.
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// SNMP error status returned by the agent.
    ///
    /// `oid` is the varbind the agent blamed, or `None` when the error index
    /// was zero or did not point into the response.
    #[error("{status} at {}", display_oid(.oid))]
    Snmp {
        target: Option<SocketAddr>,
        status: ErrorStatus,
        index: i32,
        oid: Option<Oid>,
    },

    /// A device line that does not name a host and port.
    #[error("invalid device '{address}': {reason}")]
    InvalidDevice {
        address: String,
        reason: &'static str,
    },

    /// The response could not be decoded or did not answer our request.
    #[error("malformed response{}", .target.map(|t| format!(" from {}", t)).unwrap_or_default())]
    MalformedResponse { target: Option<SocketAddr> },

    /// Invalid OID text.
    #[error("invalid OID{}: {kind}", .input.as_ref().map(|i| format!(" '{}'", i)).unwrap_or_default())]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>,
    },

    /// An input file is missing or unreadable.
    #[error("cannot read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bad entry in an input file.
    #[error("{}:{line}: {source}", .path.display())]
    InputLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<Error>,
    },

    /// The output file could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The results could not be rendered as JSON.
    #[error("cannot encode results: {0}")]
    Json(#[source] serde_json::Error),

    /// Invalid configuration or input content.
    #[error("configuration error: {0}")]
    Config(String),
}

fn display_oid(oid: &Option<Oid>) -> String {
    match oid {
        Some(oid) => oid.to_string(),
        None => "?".to_string(),
    }
}

impl Error {
    /// Box this error.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Box<Self> {
        Self::InvalidOid { kind, input: None }.boxed()
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Box<Self> {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
        .boxed()
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Box<Self> {
        Self::Config(msg.into()).boxed()
    }

    /// The device address this error concerns, if any.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. }
            | Self::Timeout { target, .. }
            | Self::Snmp { target, .. }
            | Self::MalformedResponse { target } => *target,
            _ => None,
        }
    }

    /// Whether this error belongs to a single device exchange (as opposed to
    /// input, output or configuration problems).
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::Timeout { .. }
                | Self::Resolve { .. }
                | Self::InvalidDevice { .. }
                | Self::Snmp { .. }
                | Self::MalformedResponse { .. }
        )
    }
}

/// SNMP protocol error status codes.
///
/// SNMPv1 agents only return codes 0-5; bilingual agents sometimes answer v1
/// requests with the v2 codes (6-18), so those are named as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Status code outside the RFC range.
    Unknown(i32),
}

const STATUS_TABLE: [(ErrorStatus, &str); 19] = [
    (ErrorStatus::NoError, "noError"),
    (ErrorStatus::TooBig, "tooBig"),
    (ErrorStatus::NoSuchName, "noSuchName"),
    (ErrorStatus::BadValue, "badValue"),
    (ErrorStatus::ReadOnly, "readOnly"),
    (ErrorStatus::GenErr, "genErr"),
    (ErrorStatus::NoAccess, "noAccess"),
    (ErrorStatus::WrongType, "wrongType"),
    (ErrorStatus::WrongLength, "wrongLength"),
    (ErrorStatus::WrongEncoding, "wrongEncoding"),
    (ErrorStatus::WrongValue, "wrongValue"),
    (ErrorStatus::NoCreation, "noCreation"),
    (ErrorStatus::InconsistentValue, "inconsistentValue"),
    (ErrorStatus::ResourceUnavailable, "resourceUnavailable"),
    (ErrorStatus::CommitFailed, "commitFailed"),
    (ErrorStatus::UndoFailed, "undoFailed"),
    (ErrorStatus::AuthorizationError, "authorizationError"),
    (ErrorStatus::NotWritable, "notWritable"),
    (ErrorStatus::InconsistentName, "inconsistentName"),
];

impl ErrorStatus {
    /// Create from the raw status code.
    pub fn from_i32(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|i| STATUS_TABLE.get(i))
            .map(|(status, _)| *status)
            .unwrap_or_else(|| {
                tracing::warn!(target: "snmp_scan::error", { snmp.error_status = value }, "unknown SNMP error status");
                Self::Unknown(value)
            })
    }

    /// The raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Unknown(code) => *code,
            known => STATUS_TABLE
                .iter()
                .position(|(status, _)| status == known)
                .map_or(-1, |i| i as i32),
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown({})", code),
            known => {
                let name = STATUS_TABLE
                    .iter()
                    .find(|(status, _)| status == known)
                    .map_or("unknown", |(_, name)| *name);
                f.write_str(name)
            }
        }
    }
}

/// BER decode error kinds.
///
/// These never reach the scan output; decoders log them at debug level and
/// report [`Error::MalformedResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnexpectedTag { expected: u8, actual: u8 },
    TruncatedData,
    InvalidLength,
    IndefiniteLength,
    ZeroLengthInteger,
    InvalidOidEncoding,
    UnknownVersion(i32),
    UnknownPduType(u8),
    UnexpectedPduType(u8),
    ConstructedOctetString,
    InvalidNull,
    InvalidIpAddressLength { length: usize },
    LengthTooLong { octets: usize },
    LengthExceedsMax { length: usize, max: usize },
    Integer64TooLong { length: usize },
    InsufficientData { needed: usize, available: usize },
    TrailingData { remaining: usize },
    RequestIdMismatch { expected: i32, actual: i32 },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::UnexpectedPduType(t) => write!(f, "expected Response PDU, got 0x{:02X}", t),
            Self::ConstructedOctetString => {
                write!(f, "constructed OCTET STRING (0x24) not supported")
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::Integer64TooLong { length } => write!(f, "integer64 too long: {} bytes", length),
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
            Self::TrailingData { remaining } => {
                write!(f, "{} trailing bytes after message", remaining)
            }
            Self::RequestIdMismatch { expected, actual } => {
                write!(f, "request ID mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID text.
    Empty,
    /// An arc is not a decimal `u32`.
    InvalidArc,
    /// Fewer than two arcs; such OIDs cannot be BER encoded.
    TooShort,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc must be <= 39 when first arc is 0 or 1.
    InvalidSecondArc { first: u32, second: u32 },
    /// More arcs than the protocol allows.
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "arcs must be unsigned 32-bit decimal numbers"),
            Self::TooShort => write!(f, "OID needs at least two arcs"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => write!(
                f,
                "second arc must be <= 39 when first arc is {}, got {}",
                first, second
            ),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, maximum is {}", count, max)
            }
        }
    }
}
