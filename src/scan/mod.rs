//! The concurrent polling core.
//!
//! A scan is one pass over a device list:
//!
//! 1. [`input::load`] reads the devices, the OID set and the credential.
//! 2. [`Scanner::run_batch`] polls every device once, concurrently, through
//!    an [`Adapter`] (normally [`SnmpAdapter`]).
//! 3. [`output::write_json`] writes the [`BatchResult`].
//!
//! Failures of individual devices never stop the batch; they end up in that
//! device's [`PollResult`].
//!
//! ```no_run
//! use snmp_scan::scan::{Scanner, SnmpAdapter, input, output};
//! use std::path::Path;
//!
//! # async fn run() -> snmp_scan::Result<()> {
//! let inputs = input::load(&input::InputSource::default()).await?;
//! let scanner = Scanner::new(SnmpAdapter::default()).concurrency(64);
//! let batch = scanner
//!     .run_batch(&inputs.devices, &inputs.credential, &inputs.oids)
//!     .await;
//! output::write_json(Path::new("output.json"), &batch).await?;
//! # Ok(())
//! # }
//! ```

mod adapter;
mod device;
mod orchestrator;
mod poller;
mod result;

pub mod input;
pub mod output;

pub use adapter::{Adapter, AdapterConfig, Outcome, SnmpAdapter};
pub use device::{Credential, DEFAULT_PORT, Device, OidSet};
pub use orchestrator::{DEADLINE_MESSAGE, ScanConfig, Scanner};
pub use poller::poll_device;
pub use result::{BatchResult, PollResult, Values};
