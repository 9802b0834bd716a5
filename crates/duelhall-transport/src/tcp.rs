//! Line-framed TCP transport built on `tokio::net`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Default upper bound on a single inbound line, in bytes.
pub const DEFAULT_MAX_FRAME_LEN: usize = 2048;

/// A TCP [`Transport`] that listens for incoming game clients.
pub struct TcpTransport {
    listener: TcpListener,
    max_frame_len: usize,
}

impl TcpTransport {
    /// Binds a new TCP transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP transport listening");
        Ok(Self {
            listener,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        })
    }

    /// Sets the longest line accepted from a client before the
    /// connection is treated as broken.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Returns the local address the listener is bound to.
    ///
    /// Useful when binding to port 0 and letting the OS pick one.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        // Moves are tiny; don't let Nagle hold them back.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "failed to set TCP_NODELAY");
        }

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, %addr, "accepted TCP connection");

        let (read_half, write_half) = stream.into_split();
        Ok(TcpConnection {
            id,
            peer: addr,
            reader: Mutex::new(BufReader::new(read_half)),
            writer: Mutex::new(write_half),
            max_frame_len: self.max_frame_len,
        })
    }
}

/// A single TCP connection speaking newline-terminated frames.
///
/// The read and write halves sit behind separate locks, so one task can
/// block in [`recv`](Connection::recv) while another task sends.
pub struct TcpConnection {
    id: ConnectionId,
    peer: SocketAddr,
    reader: Mutex<BufReader<OwnedReadHalf>>,
    writer: Mutex<OwnedWriteHalf>,
    max_frame_len: usize,
}

impl TcpConnection {
    /// Returns the remote peer's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let mut writer = self.writer.lock().await;
        // `write_all` loops over short writes until the whole buffer is
        // in the kernel, or the socket errors out.
        writer
            .write_all(data)
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut reader = self.reader.lock().await;
        let mut frame = Vec::new();

        // Read at most one byte past the limit: enough to tell "exactly
        // max_frame_len plus newline" apart from "too long".
        let limit = self.max_frame_len as u64 + 1;
        let n = (&mut *reader)
            .take(limit)
            .read_until(b'\n', &mut frame)
            .await
            .map_err(TransportError::ReceiveFailed)?;

        if n == 0 {
            return Ok(None);
        }

        if frame.last() == Some(&b'\n') {
            frame.pop();
            if frame.last() == Some(&b'\r') {
                frame.pop();
            }
        } else if frame.len() > self.max_frame_len {
            return Err(TransportError::FrameTooLarge {
                limit: self.max_frame_len,
            });
        }
        // Otherwise: the peer closed mid-line. Hand back what arrived; the
        // next call sees EOF.

        Ok(Some(frame))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
