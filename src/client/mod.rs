//! SNMPv1 GET client.
//!
//! A [`Client`] wraps one [`Transport`] and performs single-attempt GET
//! exchanges over it. The scanner builds one client per device poll.

use crate::error::{DecodeErrorKind, Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::transport::{Transport, UdpTransport};
use crate::util::HexBytes;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Span, instrument};

/// Default time to wait for a response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide request ID counter, shared by every client.
static NEXT_REQUEST_ID: AtomicI32 = AtomicI32::new(1);

/// Allocate a request ID in `1..=i32::MAX`.
fn next_request_id() -> i32 {
    loop {
        let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed) & i32::MAX;
        if id != 0 {
            return id;
        }
    }
}

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Community string (default: "public")
    pub community: Bytes,
    /// Request timeout (default: 5 seconds)
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            community: Bytes::from_static(b"public"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("community", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SNMPv1 client.
///
/// Generic over transport type, with [`UdpTransport`] as default.
pub struct Client<T: Transport = UdpTransport> {
    transport: T,
    config: ClientConfig,
}

impl Client<UdpTransport> {
    /// Open a UDP session to `target`.
    pub async fn connect(target: SocketAddr, config: ClientConfig) -> Result<Self> {
        let transport = UdpTransport::connect(target).await?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> Client<T> {
    /// Create a new client with the given transport and config.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Get the peer (target) address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    /// GET all `oids` in one request.
    ///
    /// Makes exactly one attempt. Returns the response varbinds in the order
    /// the agent sent them. An error status in the response becomes
    /// [`Error::Snmp`] naming the varbind at `error_index`.
    #[instrument(skip(self, oids), err(level = "debug"), fields(snmp.target = %self.peer_addr(), snmp.oid_count = oids.len()))]
    pub async fn get_many(&self, oids: &[Oid]) -> Result<Vec<VarBind>> {
        let request_id = next_request_id();
        let pdu = Pdu::get_request(request_id, oids);
        let response = self.send_request(pdu).await?;
        Ok(response.varbinds)
    }

    async fn send_request(&self, pdu: Pdu) -> Result<Pdu> {
        tracing::debug!(target: "snmp_scan::client", { snmp.varbind_count = pdu.varbinds.len() }, "sending {} request", pdu.pdu_type);

        let request_id = pdu.request_id;
        let data = CommunityMessage::v1(self.config.community.clone(), pdu).encode();
        let response = self.send_and_recv(request_id, &data).await?;

        tracing::debug!(target: "snmp_scan::client", { snmp.varbind_count = response.varbinds.len(), snmp.error_status = response.error_status, snmp.error_index = response.error_index }, "received {} response", response.pdu_type);

        Ok(response)
    }

    #[instrument(
        level = "debug",
        skip(self, data),
        fields(
            snmp.target = %self.peer_addr(),
            snmp.request_id = request_id,
            snmp.elapsed_ms = tracing::field::Empty,
        )
    )]
    async fn send_and_recv(&self, request_id: i32, data: &[u8]) -> Result<Pdu> {
        let start = Instant::now();
        let target = Some(self.peer_addr());

        tracing::trace!(target: "snmp_scan::client", { snmp.bytes = data.len() }, "sending request");
        let sent = self.transport.send(data).await;
        let received = match sent {
            Ok(()) => self.recv_reply(request_id, start).await,
            Err(e) => Err(e),
        };
        Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
        let pdu = received?;

        if pdu.pdu_type != PduType::Response {
            tracing::debug!(target: "snmp_scan::client", { kind = %DecodeErrorKind::UnexpectedPduType(pdu.pdu_type.tag()) }, "not a response");
            return Err(Error::MalformedResponse { target }.boxed());
        }

        if pdu.is_error() {
            return Err(Error::Snmp {
                target,
                status: pdu.error_status_enum(),
                index: pdu.error_index,
                oid: pdu.error_oid().cloned(),
            }
            .boxed());
        }

        Ok(pdu)
    }

    /// Wait out the timeout counted from `sent` for the datagram carrying
    /// `request_id`.
    ///
    /// Datagrams answering some other request are dropped.
    async fn recv_reply(&self, request_id: i32, sent: Instant) -> Result<Pdu> {
        let deadline = sent.checked_add(self.config.timeout);
        loop {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.config.timeout,
            };
            if remaining.is_zero() {
                return Err(Error::Timeout {
                    target: Some(self.peer_addr()),
                    elapsed: self.config.timeout,
                    request_id,
                }
                .boxed());
            }

            let (response_data, _source) = self.transport.recv(request_id, remaining).await?;
            tracing::trace!(target: "snmp_scan::client", { snmp.bytes = response_data.len(), snmp.data = %HexBytes(&response_data) }, "received response");

            let response = CommunityMessage::decode_with_target(response_data, self.peer_addr())?;
            if response.version != Version::V1 {
                tracing::debug!(target: "snmp_scan::client", { response_version = %response.version }, "agent answered a v1 request with another version");
            }

            let pdu = response.into_pdu();
            if pdu.request_id == request_id {
                return Ok(pdu);
            }
            tracing::debug!(target: "snmp_scan::client", { kind = %DecodeErrorKind::RequestIdMismatch { expected: request_id, actual: pdu.request_id } }, "dropping datagram for another request");
        }
    }
}
