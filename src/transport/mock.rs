//! Mock transport for testing.
//!
//! Provides a programmable transport that can simulate various scenarios
//! without needing an actual network connection.

use super::Transport;
use crate::error::{Error, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A mock response to return for a request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this data as the response (request_id will be patched to match)
    Data(Bytes),
    /// Return this data as-is without patching request_id
    RawData(Bytes),
    /// Simulate a timeout
    Timeout,
    /// Simulate an IO error
    IoError(std::io::ErrorKind, String),
}

/// A recorded request sent through the mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The raw request data
    pub data: Bytes,
    /// The request, if it decoded as a community message
    pub message: Option<CommunityMessage>,
}

struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
    /// Last request_id seen (for patching responses)
    last_request_id: Option<i32>,
}

/// Mock transport for testing SNMP client functionality.
///
/// Responses are served from a queue; an empty queue behaves like a silent
/// device.
///
/// ```rust,ignore
/// use snmp_scan::transport::{MockTransport, ResponseBuilder};
/// use snmp_scan::{Value, oid};
///
/// let mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
/// mock.queue_response(
///     ResponseBuilder::new(1)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("sw1"))
///         .build_v1(b"public"),
/// );
/// mock.queue_timeout();
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                last_request_id: None,
            })),
        }
    }

    // A test that panicked while holding the lock should not cascade.
    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a data response.
    ///
    /// The request_id in the response is patched to match the actual
    /// request. Use [`queue_raw_response`](Self::queue_raw_response) to
    /// bypass patching.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.lock()
            .responses
            .push_back(MockResponse::Data(data.into()));
    }

    /// Queue a raw data response without request_id patching.
    pub fn queue_raw_response(&self, data: impl Into<Bytes>) {
        self.lock()
            .responses
            .push_back(MockResponse::RawData(data.into()));
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    /// Queue an IO error.
    pub fn queue_io_error(&self, kind: std::io::ErrorKind, msg: impl Into<String>) {
        self.lock()
            .responses
            .push_back(MockResponse::IoError(kind, msg.into()));
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Get the number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }

    /// Decode, patch and re-encode; undecodable data is returned as-is.
    fn patch_response_request_id(data: Bytes, new_id: i32) -> Bytes {
        match CommunityMessage::decode(data.clone()) {
            Ok(mut msg) => {
                msg.pdu.request_id = new_id;
                msg.encode()
            }
            Err(_) => data,
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send {
        let data = Bytes::copy_from_slice(data);
        let message = CommunityMessage::decode(data.clone()).ok();

        let mut inner = self.lock();
        inner.last_request_id = message.as_ref().map(|m| m.pdu.request_id);
        inner.requests.push(RecordedRequest { data, message });

        async { Ok(()) }
    }

    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send {
        let (response, target, last_req_id) = {
            let mut inner = self.lock();
            (
                inner.responses.pop_front(),
                inner.target,
                inner.last_request_id,
            )
        };

        async move {
            match response {
                Some(MockResponse::Data(data)) => {
                    let patched = match last_req_id {
                        Some(req_id) => Self::patch_response_request_id(data, req_id),
                        None => data,
                    };
                    Ok((patched, target))
                }
                Some(MockResponse::RawData(data)) => Ok((data, target)),
                Some(MockResponse::IoError(kind, msg)) => Err(Error::Io {
                    target: Some(target),
                    source: std::io::Error::new(kind, msg),
                }
                .boxed()),
                Some(MockResponse::Timeout) | None => Err(Error::Timeout {
                    target: Some(target),
                    elapsed: timeout,
                    request_id,
                }
                .boxed()),
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.lock().target
    }
}

/// Builder for SNMP response messages in tests.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
    pdu_type: PduType,
}

impl ResponseBuilder {
    /// Create a new response builder with the given request ID.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
            pdu_type: PduType::Response,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: ErrorStatus) -> Self {
        self.error_status = status.as_i32();
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Use a PDU type other than Response.
    pub fn pdu_type(mut self, pdu_type: PduType) -> Self {
        self.pdu_type = pdu_type;
        self
    }

    fn build(self, version: Version, community: &[u8]) -> Bytes {
        let pdu = Pdu {
            pdu_type: self.pdu_type,
            request_id: self.request_id,
            error_status: self.error_status,
            error_index: self.error_index,
            varbinds: self.varbinds,
        };
        CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu).encode()
    }

    /// Build a v1 SNMP response message.
    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(Version::V1, community)
    }

    /// Build a v2c SNMP response message.
    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(Version::V2c, community)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn target() -> SocketAddr {
        "127.0.0.1:161".parse().unwrap()
    }

    #[tokio::test]
    async fn test_queue_response_patches_request_id() {
        let mock = MockTransport::new(target());
        let response = ResponseBuilder::new(1)
            .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("test"))
            .build_v1(b"public");
        mock.queue_response(response);

        let request = CommunityMessage::v1(
            b"public".as_slice(),
            Pdu::get_request(4242, &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]),
        );
        mock.send(&request.encode()).await.unwrap();

        let (data, addr) = mock.recv(4242, Duration::from_secs(1)).await.unwrap();
        assert_eq!(addr, target());
        let decoded = CommunityMessage::decode(data).unwrap();
        assert_eq!(decoded.pdu.request_id, 4242);
        assert_eq!(mock.queued_response_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_queue_times_out() {
        let mock = MockTransport::new(target());
        mock.send(b"request").await.unwrap();

        let err = mock.recv(1, Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(*err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_records_requests() {
        let mock = MockTransport::new(target());

        mock.send(b"request 1").await.unwrap();
        mock.send(b"request 2").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].data.as_ref(), b"request 1");
        assert!(requests[1].message.is_none());
    }

    #[tokio::test]
    async fn test_io_error() {
        let mock = MockTransport::new(target());
        mock.queue_io_error(std::io::ErrorKind::ConnectionRefused, "Connection refused");

        let err = mock.recv(1, Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Connection refused");
    }
}
