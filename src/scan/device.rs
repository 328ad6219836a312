//! Scan inputs: devices, the community credential and the OID set.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::oid::Oid;

/// Standard SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// A device to poll.
///
/// `address` is the device line exactly as loaded (trimmed); it is what the
/// result record reports. `host` and `port` are what gets resolved.
///
/// A device built by [`Device::from_line`] may carry the reason its line did
/// not parse; polling such a device fails without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    address: String,
    host: String,
    port: u16,
    invalid: Option<&'static str>,
}

impl Device {
    /// Build a device from a host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            address: host.clone(),
            host,
            port,
            invalid: None,
        }
    }

    /// Parse a device line.
    ///
    /// Accepted forms: `192.0.2.1`, `192.0.2.1:1161`, `2001:db8::1`,
    /// `[2001:db8::1]:1161`, `router.example.net` and
    /// `router.example.net:1161`. Lines without a port use `default_port`.
    ///
    /// ```
    /// use snmp_scan::scan::Device;
    ///
    /// let device = Device::parse("[2001:db8::1]:1161", 161).unwrap();
    /// assert_eq!(device.host(), "2001:db8::1");
    /// assert_eq!(device.port(), 1161);
    /// assert_eq!(device.address(), "[2001:db8::1]:1161");
    /// ```
    pub fn parse(line: &str, default_port: u16) -> Result<Self> {
        let address = line.trim();
        let invalid = |reason: &'static str| {
            Error::InvalidDevice {
                address: address.to_string(),
                reason,
            }
            .boxed()
        };

        if address.is_empty() {
            return Err(invalid("empty address"));
        }
        if address.contains(char::is_whitespace) {
            return Err(invalid("address contains whitespace"));
        }

        let (host, port) = if let Ok(addr) = address.parse::<SocketAddr>() {
            (addr.ip().to_string(), addr.port())
        } else if let Ok(ip) = address.parse::<IpAddr>() {
            (ip.to_string(), default_port)
        } else if address.starts_with('[') {
            return Err(invalid("malformed bracketed IPv6 address"));
        } else {
            match address.split_once(':') {
                None => (address.to_string(), default_port),
                Some((host, port)) => {
                    if host.is_empty() {
                        return Err(invalid("missing host"));
                    }
                    let port = port
                        .parse::<u16>()
                        .map_err(|_| invalid("port must be a number from 0 to 65535"))?;
                    (host.to_string(), port)
                }
            }
        };

        Ok(Self {
            address: address.to_string(),
            host,
            port,
            invalid: None,
        })
    }

    /// Parse a device line, keeping lines that do not parse.
    ///
    /// An unparsable line still becomes a device so that it gets its own
    /// result record; [`Device::validate`] reports why it cannot be polled.
    ///
    /// ```
    /// use snmp_scan::scan::Device;
    ///
    /// let device = Device::from_line("router-a:snmp", 161);
    /// assert_eq!(device.address(), "router-a:snmp");
    /// assert!(device.validate().is_err());
    /// ```
    pub fn from_line(line: &str, default_port: u16) -> Self {
        match Self::parse(line, default_port) {
            Ok(device) => device,
            Err(err) => {
                let address = line.trim().to_string();
                let reason = match *err {
                    Error::InvalidDevice { reason, .. } => reason,
                    _ => "unparsable address",
                };
                Self {
                    host: address.clone(),
                    address,
                    port: default_port,
                    invalid: Some(reason),
                }
            }
        }
    }

    /// Check that the device names a pollable host and port.
    pub fn validate(&self) -> Result<()> {
        match self.invalid {
            Some(reason) => Err(Error::InvalidDevice {
                address: self.address.clone(),
                reason,
            }
            .boxed()),
            None => Ok(()),
        }
    }

    /// The device as written in the input.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Host name or IP literal to resolve.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// UDP port of the agent.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to a socket address.
    ///
    /// IP literals never touch the resolver; names use the system resolver
    /// and the first address returned wins.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        self.validate()?;
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let resolve_err = |source| Error::Resolve {
            host: self.host.clone(),
            source,
        };

        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(resolve_err)?;
        let addr = addrs.next().ok_or_else(|| {
            resolve_err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses found",
            ))
        })?;

        tracing::trace!(target: "snmp_scan::scan", { snmp.host = %self.host, snmp.target = %addr }, "resolved device");
        Ok(addr)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// SNMPv1 community string.
///
/// Never shown by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    community: Bytes,
}

impl Credential {
    /// Wrap a community string; it must not be empty.
    pub fn new(community: impl Into<Bytes>) -> Result<Self> {
        let community = community.into();
        if community.is_empty() {
            return Err(Error::config("community string is empty"));
        }
        Ok(Self { community })
    }

    /// The community as sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.community
    }

    /// A cheap clone of the community bytes.
    pub fn to_bytes(&self) -> Bytes {
        self.community.clone()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("community", &"<redacted>")
            .finish()
    }
}

/// The ordered, non-empty set of OIDs requested from every device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidSet {
    oids: Vec<Oid>,
}

impl OidSet {
    /// Build from already parsed OIDs.
    pub fn new(oids: Vec<Oid>) -> Result<Self> {
        if oids.is_empty() {
            return Err(Error::config("OID list is empty"));
        }
        for oid in &oids {
            oid.validate()?;
        }
        Ok(Self { oids })
    }

    /// Parse every entry as dotted-decimal.
    ///
    /// ```
    /// use snmp_scan::scan::OidSet;
    ///
    /// let oids = OidSet::parse_all(["1.3.6.1.2.1.1.1.0", "1.3.6.1.2.1.1.5.0"]).unwrap();
    /// assert_eq!(oids.len(), 2);
    /// assert!(OidSet::parse_all(Vec::<&str>::new()).is_err());
    /// ```
    pub fn parse_all<'a>(texts: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let oids = texts
            .into_iter()
            .map(Oid::parse)
            .collect::<Result<Vec<_>>>()?;
        Self::new(oids)
    }

    /// The OIDs in request order.
    pub fn as_slice(&self) -> &[Oid] {
        &self.oids
    }

    /// Number of OIDs.
    pub fn len(&self) -> usize {
        self.oids.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.oids.is_empty()
    }
}
