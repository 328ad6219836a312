//! # snmp-scan
//!
//! Concurrent one-shot SNMPv1 GET scanner.
//!
//! Reads a device list and an OID list, sends one GetRequest carrying every
//! OID to every device at once, and collects one record per device: either
//! the values the device returned or the reason it failed. Results keep the
//! order of the device list no matter which device answers first.
//!
//! ## Layers
//!
//! - [`scan`] - the polling core: [`Scanner`](scan::Scanner), the
//!   [`Adapter`](scan::Adapter) seam, input loading and JSON output
//! - [`client`] - single-attempt SNMPv1 GET over a [`Transport`]
//! - [`message`], [`pdu`], [`varbind`], [`value`], [`oid`], [`ber`] - the
//!   SNMPv1 wire format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_scan::scan::{Credential, Device, OidSet, Scanner, SnmpAdapter};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<snmp_scan::Error>> {
//!     let devices = vec![
//!         Device::parse("192.0.2.1", 161)?,
//!         Device::parse("192.0.2.2:1161", 161)?,
//!     ];
//!     let oids = OidSet::parse_all(["1.3.6.1.2.1.1.5.0", "1.3.6.1.2.1.1.3.0"])?;
//!     let credential = Credential::new("public")?;
//!
//!     let scanner = Scanner::new(SnmpAdapter::default().timeout(Duration::from_secs(2)));
//!     let batch = scanner.run_batch(&devices, &credential, &oids).await;
//!
//!     for result in &batch {
//!         match result.error() {
//!             Some(err) => println!("{}: {}", result.device(), err),
//!             None => println!("{}: {} values", result.device(), result.values().len()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod client;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod scan;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use client::{Client, ClientConfig};
pub use error::{DecodeErrorKind, Error, ErrorStatus, OidErrorKind, Result};
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use scan::{
    Adapter, BatchResult, Credential, Device, OidSet, Outcome, PollResult, ScanConfig, Scanner,
    SnmpAdapter,
};
pub use transport::{Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
