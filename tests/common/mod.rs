//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use devproxy::config::DevServerConfig;
use devproxy::http::DevServer;
use devproxy::lifecycle::Shutdown;

/// Request heads (request line + headers) a mock backend has received.
#[derive(Clone, Default)]
pub struct RecordedRequests {
    inner: Arc<Mutex<Vec<String>>>,
}

impl RecordedRequests {
    fn push(&self, head: String) {
        self.inner.lock().unwrap().push(head);
    }

    pub fn last(&self) -> Option<String> {
        self.inner.lock().unwrap().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

/// Start a mock backend on an OS-assigned port that answers every request
/// with a fixed body and records the request head it received.
pub async fn start_recording_backend(body: &'static str) -> (SocketAddr, RecordedRequests) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = RecordedRequests::default();
    let recorder = recorded.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let recorder = recorder.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut head = Vec::new();
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) => break,
                        Ok(n) => {
                            head.extend_from_slice(&buf[..n]);
                            if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => return,
                    }
                }
                recorder.push(String::from_utf8_lossy(&head).into_owned());

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, recorded)
}

/// Reserve a port that nothing listens on, for unreachable-backend tests.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start the dev server on an OS-assigned port.
///
/// Returns the proxy address and the shutdown coordinator; tests trigger it
/// when done.
#[allow(dead_code)]
pub async fn start_proxy(config: DevServerConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = DevServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the acceptor a moment to come up.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}
