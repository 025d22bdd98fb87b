//! Shared utilities for integration testing.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fault_endpoint::config::LoggingConfig;
use fault_endpoint::net::Listener;
use fault_endpoint::observability::{logging, Logger};
use fault_endpoint::{FaultServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory JSON log sink.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn records(&self) -> Vec<serde_json::Value> {
        let raw = self.0.lock().unwrap().clone();
        String::from_utf8(raw)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// Records with the given message, in emission order.
    pub fn with_message(&self, message: &str) -> Vec<serde_json::Value> {
        self.records()
            .into_iter()
            .filter(|record| record["message"] == message)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A server running on an ephemeral loopback port.
///
/// Stops accepting when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub logs: CapturedLogs,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start() -> Self {
        let logs = CapturedLogs::default();
        let logger = Logger::new(logging::build_dispatch(&LoggingConfig::default(), logs.clone()));

        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let listener = Listener::from_tcp(tcp, &logger).unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let server = FaultServer::new(logger);
        tokio::spawn(server.run(listener, server_shutdown));

        Self {
            addr,
            logs,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Send a raw HTTP/1.1 request with extra header lines (each ending in CRLF).
pub async fn send_raw(addr: SocketAddr, path: &str, extra_headers: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\n{extra_headers}\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    stream
}

/// Read until the peer closes, giving up after `limit`.
///
/// Returns everything received and whether the close was observed in time.
pub async fn read_until_close(stream: &mut TcpStream, limit: Duration) -> (Vec<u8>, bool) {
    let mut received = Vec::new();
    let closed = tokio::time::timeout(limit, async {
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => received.extend_from_slice(&buf[..n]),
            }
        }
    })
    .await
    .is_ok();
    (received, closed)
}
