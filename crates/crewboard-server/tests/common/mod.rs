use std::net::SocketAddr;
use std::time::Duration;

use crewboard_core::test_helpers::make_roster;
use crewboard_server::build_app;
use crewboard_server::config::{AuthFileConfig, ServerConfig, TasksConfig};

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with a three-agent roster and no auth.
    pub async fn new() -> Self {
        Self::from_config(test_config()).await
    }

    /// Start a test server with task assignment enabled.
    pub async fn with_assignment_enabled() -> Self {
        let config = ServerConfig {
            tasks: TasksConfig {
                allow_assignment: true,
            },
            ..test_config()
        };
        Self::from_config(config).await
    }

    /// Start a test server that requires a bearer token on ingress routes.
    pub async fn with_auth(token: &str) -> Self {
        let config = ServerConfig {
            auth: AuthFileConfig {
                bearer_token: Some(token.to_string()),
            },
            ..test_config()
        };
        Self::from_config(config).await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("http://{}/api/v1{path}", self.addr)
    }
}

/// Default test configuration: known agents alpha, bravo, charlie.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        roster: make_roster(&["alpha", "bravo", "charlie"]),
        ..ServerConfig::default()
    }
}

/// Read SSE chunks from an open response until `needle` appears or the
/// timeout elapses. Returns everything collected so far.
pub async fn read_sse_until(
    mut resp: reqwest::Response,
    needle: &str,
    timeout: Duration,
) -> (bool, String) {
    let mut collected = String::new();
    let found = tokio::time::timeout(timeout, async {
        loop {
            match resp.chunk().await {
                Ok(Some(bytes)) => {
                    collected.push_str(&String::from_utf8_lossy(&bytes));
                    if collected.contains(needle) {
                        return true;
                    }
                },
                _ => return false,
            }
        }
    })
    .await
    .unwrap_or(false);
    (found, collected)
}
