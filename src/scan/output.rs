//! Writing the batch result as JSON.
//!
//! The document is an array with one object per device, in device order,
//! indented by four spaces and ending with a newline:
//!
//! ```text
//! [
//!     {
//!         "IP": "10.0.0.1",
//!         "OIDs": {
//!             "1.3.6.1.2.1.1.5.0": "core-sw"
//!         }
//!     }
//! ]
//! ```

use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::scan::result::BatchResult;

/// Render `batch` exactly as [`write_json`] writes it.
pub fn to_json_string(batch: &BatchResult) -> Result<String> {
    let mut out = Vec::with_capacity(128 * batch.len().max(1));
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    batch
        .serialize(&mut serializer)
        .map_err(|err| Error::Json(err).boxed())?;
    out.push(b'\n');

    // serde_json only emits UTF-8, so nothing is ever replaced here.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Write `batch` to `path`, replacing any existing file.
pub async fn write_json(path: &Path, batch: &BatchResult) -> Result<()> {
    let json = to_json_string(batch)?;
    tokio::fs::write(path, json.as_bytes())
        .await
        .map_err(|source| {
            Error::Output {
                path: path.to_path_buf(),
                source,
            }
            .boxed()
        })?;

    tracing::debug!(target: "snmp_scan::scan", { path = %path.display(), bytes = json.len() }, "results written");
    Ok(())
}
