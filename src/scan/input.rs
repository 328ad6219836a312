//! Loading the device list, OID list and credential.
//!
//! Both list files are plain text with one entry per line. Lines are trimmed
//! and blank lines are skipped. File and OID problems are reported before any
//! device is polled; a device line that does not parse is kept and fails on
//! its own when polled.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::scan::device::{Credential, DEFAULT_PORT, Device, OidSet};

/// Where the scan inputs come from.
#[derive(Clone)]
pub struct InputSource {
    /// Device list, one address per line.
    pub devices: PathBuf,
    /// OID list, one dotted-decimal OID per line.
    pub oids: PathBuf,
    /// Community string.
    pub community: String,
    /// Port for device lines that do not name one.
    pub port: u16,
}

impl Default for InputSource {
    fn default() -> Self {
        Self {
            devices: PathBuf::from("input.txt"),
            oids: PathBuf::from("oids.txt"),
            community: "public".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSource")
            .field("devices", &self.devices)
            .field("oids", &self.oids)
            .field("community", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

/// Everything a batch needs.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub devices: Vec<Device>,
    pub oids: OidSet,
    pub credential: Credential,
}

/// Load and validate all inputs named by `source`.
pub async fn load(source: &InputSource) -> Result<Inputs> {
    let credential = Credential::new(source.community.clone())?;
    let devices = load_devices(&source.devices, source.port).await?;
    let oids = load_oids(&source.oids).await?;

    tracing::debug!(target: "snmp_scan::scan", { snmp.device_count = devices.len(), snmp.oid_count = oids.len() }, "inputs loaded");
    Ok(Inputs {
        devices,
        oids,
        credential,
    })
}

/// Read the device list. An empty file yields an empty list.
///
/// Every non-blank line becomes a device, in file order.
pub async fn load_devices(path: &Path, default_port: u16) -> Result<Vec<Device>> {
    let devices = read_lines(path)
        .await?
        .into_iter()
        .map(|(line_no, line)| {
            let device = Device::from_line(&line, default_port);
            if let Err(err) = device.validate() {
                tracing::warn!(target: "snmp_scan::scan", { path = %path.display(), line = line_no, error = %err }, "device line will not be polled");
            }
            device
        })
        .collect();
    Ok(devices)
}

/// Read the OID list. The list must not be empty.
pub async fn load_oids(path: &Path) -> Result<OidSet> {
    let oids = read_lines(path)
        .await?
        .into_iter()
        .map(|(line_no, line)| {
            Oid::parse(&line).map_err(|source| {
                Error::InputLine {
                    path: path.to_path_buf(),
                    line: line_no,
                    source,
                }
                .boxed()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if oids.is_empty() {
        return Err(Error::config(format!(
            "{}: OID list is empty",
            path.display()
        )));
    }
    OidSet::new(oids)
}

/// Non-blank trimmed lines with their 1-based line numbers.
async fn read_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| {
            Error::Input {
                path: path.to_path_buf(),
                source,
            }
            .boxed()
        })?;

    Ok(text
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            (!line.is_empty()).then(|| (i + 1, line.to_string()))
        })
        .collect())
}
