//! Shared test fixtures.

use std::time::Duration;

/// A real server instance running inside the test process.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Spawn the server on 127.0.0.1:`port` and wait until it accepts
    /// TCP connections.
    pub async fn start(port: u16) -> Self {
        tokio::spawn(async move {
            if let Err(e) = chat_rooms_rs::run_server("127.0.0.1", port).await {
                panic!("server failed to run: {e}");
            }
        });

        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok()
            {
                return Self { port };
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server did not start on port {port}");
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }
}
