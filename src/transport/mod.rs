//! Transport layer abstraction.
//!
//! A [`Transport`] carries one device's datagrams. The scanner opens a fresh
//! [`UdpTransport`] per poll and drops it when the poll ends, so every exit
//! path releases the socket.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::UdpTransport;

#[cfg(any(test, feature = "testing"))]
pub use mock::{MockResponse, MockTransport, RecordedRequest, ResponseBuilder};

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Client-side transport abstraction.
pub trait Transport: Send + Sync {
    /// Send request data to the target.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Receive one datagram, waiting at most `timeout`.
    ///
    /// `request_id` is only used for diagnostics; correlation is checked by
    /// the client after decoding.
    ///
    /// Returns (response_data, actual_source_address)
    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    /// The peer address for this transport.
    fn peer_addr(&self) -> SocketAddr;
}
