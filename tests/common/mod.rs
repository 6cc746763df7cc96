//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;

use httpfile_mock::config::MockConfig;
use httpfile_mock::lifecycle::{start, Shutdown};

/// Write a definition file into `dir`.
#[allow(dead_code)]
pub fn write_definitions(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// Default config serving `dir` on an ephemeral port.
#[allow(dead_code)]
pub fn config_for(dir: &Path) -> MockConfig {
    let mut config = MockConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.routes.directory = dir.to_path_buf();
    config
}

/// A running server, shut down on drop.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the full server stack for `config`.
#[allow(dead_code)]
pub async fn start_server(config: MockConfig) -> TestServer {
    let started = start(config).await.expect("server should start");
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let addr = started.local_addr;

    tokio::spawn(async move {
        let _watcher = started.watcher;
        let _ = started.server.run(started.listener, signal).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}
