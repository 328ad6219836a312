//! UDP transport implementation.

use super::Transport;
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Largest datagram we accept.
const MAX_DATAGRAM: usize = 65535;

/// UDP transport for a single target.
///
/// Owns a UDP socket bound to an ephemeral port and connected to the target,
/// so datagrams from other sources are filtered by the kernel. The socket is
/// closed when the transport is dropped.
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Connect to a target address.
    ///
    /// For IPv6 targets, the socket has `IPV6_V6ONLY` set to true.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        let io_err = |source| Error::Io {
            target: Some(target),
            source,
        };

        let socket = bind_ephemeral_udp_socket(target).map_err(io_err)?;
        socket.connect(target).await.map_err(io_err)?;
        let local_addr = socket.local_addr().map_err(io_err)?;

        tracing::trace!(
            target: "snmp_scan::transport",
            { snmp.target = %target, snmp.local_addr = %local_addr },
            "UDP transport connected"
        );

        Ok(Self {
            socket,
            target,
            local_addr,
        })
    }

    /// Local bind address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmp_scan::transport",
            { snmp.target = %self.target, snmp.bytes = data.len() },
            "UDP send"
        );
        self.socket.send(data).await.map_err(|e| Error::Io {
            target: Some(self.target),
            source: e,
        })?;
        Ok(())
    }

    async fn recv(&self, request_id: i32, recv_timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let mut buf = vec![0u8; MAX_DATAGRAM];

        match timeout(recv_timeout, self.socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(
                    target: "snmp_scan::transport",
                    { snmp.target = %self.target, snmp.bytes = len },
                    "UDP recv complete"
                );
                Ok((Bytes::from(buf), self.target))
            }
            // ICMP port unreachable surfaces here as ConnectionRefused.
            Ok(Err(e)) => Err(Error::Io {
                target: Some(self.target),
                source: e,
            }
            .boxed()),
            Err(_) => {
                tracing::trace!(
                    target: "snmp_scan::transport",
                    { snmp.target = %self.target, snmp.request_id = request_id },
                    "UDP recv timeout"
                );
                Err(Error::Timeout {
                    target: Some(self.target),
                    elapsed: recv_timeout,
                    request_id,
                }
                .boxed())
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_and_receive_echo() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(peer.local_addr().unwrap())
            .await
            .unwrap();
        assert_eq!(transport.peer_addr(), peer.local_addr().unwrap());

        transport.send(b"ping").await.unwrap();
        let mut buf = [0u8; 16];
        let (len, from) = peer.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"ping");
        assert_eq!(from.port(), transport.local_addr().port());

        peer.send_to(b"pong", from).await.unwrap();
        let (data, source) = transport.recv(1, Duration::from_secs(2)).await.unwrap();
        assert_eq!(data.as_ref(), b"pong");
        assert_eq!(source, peer.local_addr().unwrap());
    }

    #[tokio::test]
    async fn recv_times_out() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(peer.local_addr().unwrap())
            .await
            .unwrap();

        let err = transport
            .recv(77, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(
            *err,
            Error::Timeout {
                request_id: 77,
                ..
            }
        ));
    }
}
