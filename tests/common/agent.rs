//! In-process SNMPv1 agent for testing.
//!
//! Answers GetRequests from a fixed MIB over a real UDP socket bound to an
//! ephemeral localhost port, and shuts down cleanly on drop.

use crate::common::fixtures;

use bytes::Bytes;
use snmp_scan::message::CommunityMessage;
use snmp_scan::pdu::{Pdu, PduType};
use snmp_scan::{ErrorStatus, Oid, Value, VarBind};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How the agent treats well-formed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    /// Answer immediately.
    Normal,
    /// Answer after a delay.
    Delayed(Duration),
    /// Receive and count requests, never answer.
    Silent,
}

/// An in-process SNMPv1 agent for testing.
///
/// A GetRequest naming an OID missing from the MIB gets a `noSuchName`
/// response whose error index points at the first missing varbind. Requests
/// with the wrong community are dropped, like real v1 agents do.
pub struct TestAgent {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl TestAgent {
    /// Agent serving the standard system MIB.
    pub async fn new() -> Self {
        Self::with_data(fixtures::system_mib()).await
    }

    /// Agent serving `data`.
    pub async fn with_data(data: BTreeMap<Oid, Value>) -> Self {
        Self::start(data, AgentMode::Normal).await
    }

    /// Agent serving the system MIB in the given mode.
    pub async fn with_mode(mode: AgentMode) -> Self {
        Self::start(fixtures::system_mib(), mode).await
    }

    async fn start(data: BTreeMap<Oid, Value>, mode: AgentMode) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test agent");
        let addr = socket.local_addr().expect("local addr");
        let cancel = CancellationToken::new();
        let requests = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(serve(
            Arc::new(socket),
            Arc::new(data),
            mode,
            requests.clone(),
            cancel.clone(),
        ));

        Self {
            addr,
            requests,
            cancel,
            _task: task,
        }
    }

    /// The agent's listening address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of well-formed requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stop answering. Called automatically on drop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn serve(
    socket: Arc<UdpSocket>,
    data: Arc<BTreeMap<Oid, Value>>,
    mode: AgentMode,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; 65535];
    loop {
        let (len, peer) = tokio::select! {
            _ = cancel.cancelled() => return,
            received = socket.recv_from(&mut buf) => match received {
                Ok(received) => received,
                Err(_) => continue,
            },
        };

        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };
        if request.community.as_ref() != fixtures::COMMUNITY.as_bytes()
            || request.pdu.pdu_type != PduType::GetRequest
        {
            continue;
        }
        requests.fetch_add(1, Ordering::SeqCst);

        let delay = match mode {
            AgentMode::Silent => continue,
            AgentMode::Delayed(delay) => delay,
            AgentMode::Normal => Duration::ZERO,
        };

        let response = CommunityMessage::new(request.version, request.community, answer(&data, &request.pdu));
        let socket = socket.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = socket.send_to(&response.encode(), peer).await;
        });
    }
}

fn answer(data: &BTreeMap<Oid, Value>, request: &Pdu) -> Pdu {
    let missing = request
        .varbinds
        .iter()
        .position(|vb| !data.contains_key(&vb.oid));

    match missing {
        Some(i) => request.to_error_response(ErrorStatus::NoSuchName, i as i32 + 1),
        None => Pdu::response(
            request.request_id,
            request
                .varbinds
                .iter()
                .map(|vb| VarBind::new(vb.oid.clone(), data[&vb.oid].clone()))
                .collect(),
        ),
    }
}
