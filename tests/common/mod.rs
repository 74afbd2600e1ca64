//! Shared utilities for integration tests.

use std::net::SocketAddr;

use finance_edge::{EdgeServer, Mounts, ServerConfig, Shutdown};
use tokio::net::TcpListener;

/// A server bound to an ephemeral port. Stops when `shutdown` fires.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_server(config: ServerConfig, mounts: Mounts) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = EdgeServer::new(config, mounts).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// A client that never routes through an environment proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Like [`client`], with a cookie jar.
#[allow(dead_code)]
pub fn client_with_cookies() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .cookie_store(true)
        .build()
        .unwrap()
}
