//! Single-device polling.

use crate::scan::adapter::{Adapter, Outcome};
use crate::scan::device::{Credential, Device, OidSet};
use crate::scan::result::PollResult;

/// Poll one device exactly once and normalize the outcome into its record.
///
/// A device whose line did not parse is recorded as a failure without
/// calling the adapter.
pub async fn poll_device<A: Adapter>(
    adapter: &A,
    device: &Device,
    credential: &Credential,
    oids: &OidSet,
) -> PollResult {
    let outcome = match device.validate() {
        Ok(()) => adapter.poll(device, credential, oids).await,
        Err(err) => Outcome::failure(err.to_string()),
    };
    match outcome {
        Outcome::Success { values } => {
            tracing::debug!(target: "snmp_scan::scan", { snmp.device = %device, snmp.value_count = values.len() }, "device polled");
            PollResult::success(device.address(), values)
        }
        Outcome::Failure { message } => {
            tracing::debug!(target: "snmp_scan::scan", { snmp.device = %device, error = %message }, "device poll failed");
            PollResult::failure(device.address(), message)
        }
    }
}
