//! Integration tests for the TCP transport.
//!
//! These tests spin up a real listener on an OS-assigned port and talk to
//! it with a plain `TcpStream`, so the framing is checked against actual
//! socket behavior (partial reads, EOF) rather than a mock.

use duelhall_transport::{Connection, TcpConnection, TcpTransport, Transport, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Binds on port 0, connects one client, and returns both ends.
async fn connected_pair(max_frame_len: Option<usize>) -> (TcpConnection, TcpStream) {
    let mut transport = TcpTransport::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    if let Some(limit) = max_frame_len {
        transport = transport.with_max_frame_len(limit);
    }
    let addr = transport.local_addr().expect("should have local addr");

    let server_handle = tokio::spawn(async move {
        transport.accept().await.expect("should accept")
    });
    let client = TcpStream::connect(addr).await.expect("client should connect");
    let server_conn = server_handle.await.expect("task should complete");
    (server_conn, client)
}

#[tokio::test]
async fn test_tcp_send_and_receive_lines() {
    let (server_conn, mut client) = connected_pair(None).await;
    assert!(server_conn.id().into_inner() > 0);

    // --- Server sends, client receives ---
    server_conn
        .send(b"SELECT_GAME\n")
        .await
        .expect("send should succeed");
    let mut buf = [0u8; 12];
    client.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"SELECT_GAME\n");

    // --- Client sends two lines in one write, server splits them ---
    client
        .write_all(b"GAME:CHESS\r\nMOVE:P5W e4\n")
        .await
        .unwrap();

    let first = server_conn.recv().await.expect("recv").expect("frame");
    assert_eq!(first, b"GAME:CHESS");
    let second = server_conn.recv().await.expect("recv").expect("frame");
    assert_eq!(second, b"MOVE:P5W e4");
}

#[tokio::test]
async fn test_tcp_recv_returns_none_on_client_close() {
    let (server_conn, client) = connected_pair(None).await;
    drop(client);

    let result = server_conn.recv().await.expect("recv should not error");
    assert!(result.is_none(), "should return None on client close");
}

#[tokio::test]
async fn test_tcp_recv_returns_unterminated_tail_before_eof() {
    let (server_conn, mut client) = connected_pair(None).await;
    client.write_all(b"ROLL").await.unwrap();
    client.shutdown().await.unwrap();

    let tail = server_conn.recv().await.unwrap();
    assert_eq!(tail.as_deref(), Some(&b"ROLL"[..]));
    assert!(server_conn.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_tcp_recv_rejects_oversized_frame() {
    let (server_conn, mut client) = connected_pair(Some(8)).await;
    client.write_all(b"0123456789abcdef\n").await.unwrap();

    let result = server_conn.recv().await;
    assert!(
        matches!(result, Err(TransportError::FrameTooLarge { limit: 8 })),
        "expected FrameTooLarge, got {result:?}"
    );
}

#[tokio::test]
async fn test_tcp_frame_at_exact_limit_is_accepted() {
    let (server_conn, mut client) = connected_pair(Some(5)).await;
    client.write_all(b"MANGO\n").await.unwrap();

    let frame = server_conn.recv().await.unwrap().unwrap();
    assert_eq!(frame, b"MANGO");
}

#[tokio::test]
async fn test_tcp_close_sends_eof_to_client() {
    let (server_conn, mut client) = connected_pair(None).await;
    server_conn.close().await.expect("close should succeed");

    let mut rest = Vec::new();
    let n = client.read_to_end(&mut rest).await.unwrap();
    assert_eq!(n, 0);
}
