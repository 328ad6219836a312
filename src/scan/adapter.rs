//! The seam between the scan core and the SNMP exchange.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{Client, ClientConfig, DEFAULT_TIMEOUT};
use crate::error::Result;
use crate::scan::device::{Credential, Device, OidSet};
use crate::scan::result::Values;
use crate::varbind::VarBind;

/// Outcome of polling one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The device answered with error-status 0.
    Success { values: Values },
    /// No usable answer; `message` is the diagnostic shown in the output.
    Failure { message: String },
}

impl Outcome {
    /// Fold an exchange result into an outcome.
    pub fn from_result(result: Result<Vec<VarBind>>) -> Self {
        match result {
            Ok(varbinds) => Outcome::Success {
                values: varbinds
                    .iter()
                    .map(|vb| (vb.oid.to_string(), vb.value.to_string()))
                    .collect(),
            },
            Err(err) => Outcome::Failure {
                message: err.to_string(),
            },
        }
    }

    /// Shorthand for a failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
        }
    }
}

/// Performs one GET exchange with one device.
///
/// Implementations never fail: every problem becomes [`Outcome::Failure`].
pub trait Adapter: Send + Sync + 'static {
    /// Poll `device` for `oids`.
    fn poll(
        &self,
        device: &Device,
        credential: &Credential,
        oids: &OidSet,
    ) -> impl Future<Output = Outcome> + Send;
}

impl<A: Adapter> Adapter for Arc<A> {
    fn poll(
        &self,
        device: &Device,
        credential: &Credential,
        oids: &OidSet,
    ) -> impl Future<Output = Outcome> + Send {
        (**self).poll(device, credential, oids)
    }
}

/// Adapter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    /// How long to wait for the response (default: 5 seconds)
    pub timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// SNMPv1 over UDP.
///
/// Each poll resolves the device, opens its own socket, sends one
/// GetRequest with every OID and waits once. The socket is closed when the
/// poll returns.
#[derive(Debug, Clone, Default)]
pub struct SnmpAdapter {
    config: AdapterConfig,
}

impl SnmpAdapter {
    /// Create an adapter with the given settings.
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    /// Set the response timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    async fn exchange(
        &self,
        device: &Device,
        credential: &Credential,
        oids: &OidSet,
    ) -> Result<Vec<VarBind>> {
        let target = device.resolve().await?;
        let config = ClientConfig {
            community: credential.to_bytes(),
            timeout: self.config.timeout,
        };
        let client = Client::connect(target, config).await?;
        client.get_many(oids.as_slice()).await
    }
}

impl Adapter for SnmpAdapter {
    async fn poll(&self, device: &Device, credential: &Credential, oids: &OidSet) -> Outcome {
        Outcome::from_result(self.exchange(device, credential, oids).await)
    }
}
