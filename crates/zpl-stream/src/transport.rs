//! Raw TCP delivery of a finished command stream.
//!
//! The protocol has no response channel in this use: connect, write the
//! UTF-8 bytes once, close. At-most-once by design — no retry lives here;
//! callers needing reliability re-invoke explicitly.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("printer unreachable at {host}:{port}: {source}")]
    Unreachable {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("transmission to {host}:{port} failed after connect: {source}")]
    TransmissionFailed {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

fn timed_out(host: &str, port: u16) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        format!("connect to {host}:{port} timed out"),
    )
}

/// Send a command stream to the printer in a single write.
pub async fn send(
    host: &str,
    port: u16,
    stream: &str,
    connect_timeout: Duration,
) -> Result<(), TransportError> {
    let unreachable = |source| TransportError::Unreachable {
        host: host.to_string(),
        port,
        source,
    };

    let mut socket = timeout(connect_timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| unreachable(timed_out(host, port)))?
        .map_err(unreachable)?;
    debug!(host, port, bytes = stream.len(), "Connected, sending command stream");

    let failed = |source| TransportError::TransmissionFailed {
        host: host.to_string(),
        port,
        source,
    };
    socket.write_all(stream.as_bytes()).await.map_err(failed)?;
    socket.shutdown().await.map_err(failed)?;

    info!(host, port, bytes = stream.len(), "Command stream delivered");
    Ok(())
}

/// Connect-only reachability check. Sends nothing.
pub async fn probe(host: &str, port: u16, connect_timeout: Duration) -> bool {
    matches!(
        timeout(connect_timeout, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn send_delivers_exact_utf8_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            sock.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let payload = "^XA\n^MUd,96,304\n^FO1,2^A0N,12,7^FDhi^FS\n^XZ\n";
        send("127.0.0.1", port, payload, TIMEOUT).await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received, payload.as_bytes());
    }

    #[tokio::test]
    async fn closed_port_reports_unreachable() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = send("127.0.0.1", port, "^XA^XZ", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, TransportError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn probe_reflects_reachability() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(probe("127.0.0.1", port, TIMEOUT).await);

        drop(listener);
        assert!(!probe("127.0.0.1", port, TIMEOUT).await);
    }

    #[tokio::test]
    async fn probe_sends_no_data() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            sock.read_to_end(&mut buf).await.unwrap();
            buf
        });

        assert!(probe("127.0.0.1", port, TIMEOUT).await);
        let received = server.await.unwrap();
        assert!(received.is_empty());
    }
}
