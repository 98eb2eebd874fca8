use std::collections::HashSet;

use serde::Deserialize;

use crewboard_core::roster::Roster;

/// Top-level server configuration, loaded from `crewboard.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub auth: AuthFileConfig,
    pub limits: LimitsConfig,
    pub tasks: TasksConfig,
    pub roster: Roster,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            web_root: "web".to_string(),
            auth: AuthFileConfig::default(),
            limits: LimitsConfig::default(),
            tasks: TasksConfig::default(),
            roster: Roster::default(),
        }
    }
}

/// Auth section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthFileConfig {
    pub bearer_token: Option<String>,
}

/// Infrastructure limits (connection caps, buffer sizes, payload bounds).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_sse_subscribers: usize,
    pub broadcast_capacity: usize,
    /// Maximum number of agent entries accepted in one bulk update.
    pub bulk_update_agent_limit: usize,
    /// Maximum task description length in bytes.
    pub task_description_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_sse_subscribers: 100,
            broadcast_capacity: 1024,
            bulk_update_agent_limit: 100,
            task_description_limit: 1024,
        }
    }
}

/// Task assignment capability.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// When false, POST /assign-task always returns 403. Off by default:
    /// task descriptions can be replayed from an agent's own transcript,
    /// so accepting them from untrusted input is an injection vector.
    pub allow_assignment: bool,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            allow_assignment: false,
        }
    }
}

impl ServerConfig {
    /// Validate configuration, logging warnings for issues and exiting on
    /// fatal misconfiguration.
    pub fn validate(&self) {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            tracing::error!(
                addr = %self.listen_addr,
                "listen_addr is not a valid socket address"
            );
            std::process::exit(1);
        }

        if self.limits.max_sse_subscribers == 0 {
            tracing::error!("limits.max_sse_subscribers must be > 0");
            std::process::exit(1);
        }
        if self.limits.broadcast_capacity == 0 {
            tracing::error!("limits.broadcast_capacity must be > 0");
            std::process::exit(1);
        }
        if self.limits.bulk_update_agent_limit == 0 {
            tracing::error!("limits.bulk_update_agent_limit must be > 0");
            std::process::exit(1);
        }
        if self.limits.task_description_limit == 0 {
            tracing::error!("limits.task_description_limit must be > 0");
            std::process::exit(1);
        }

        let mut seen = HashSet::new();
        for id in self.roster.ids() {
            if id.is_empty() {
                tracing::error!("roster contains an agent with an empty id");
                std::process::exit(1);
            }
            if !seen.insert(id.as_str()) {
                tracing::error!(agent = %id, "duplicate agent id in roster");
                std::process::exit(1);
            }
        }
        if self.roster.is_empty() {
            tracing::warn!("roster is empty — the dashboard has no agents to track");
        }

        // Warn about secrets in the config file (should use env vars in production)
        if self.auth.bearer_token.is_some() {
            tracing::warn!(
                "bearer_token is set in config file — use CREWBOARD_API_TOKEN env var in production"
            );
        }
        if self.tasks.allow_assignment {
            tracing::warn!("task assignment over HTTP is enabled");
        }
    }

    /// Load config from `crewboard.toml` if it exists, then apply env var
    /// overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("crewboard.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from crewboard.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse crewboard.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No crewboard.toml found, using defaults");
                ServerConfig::default()
            },
        };

        // Environment variable overrides
        if let Ok(addr) = std::env::var("CREWBOARD_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("CREWBOARD_WEB_ROOT")
            && !root.is_empty()
        {
            config.web_root = root;
        }
        if let Ok(token) = std::env::var("CREWBOARD_API_TOKEN")
            && !token.is_empty()
        {
            config.auth.bearer_token = Some(token);
        }
        if let Ok(val) = std::env::var("CREWBOARD_MAX_SSE_SUBSCRIBERS")
            && let Ok(n) = val.parse::<usize>()
        {
            config.limits.max_sse_subscribers = n;
        }
        if let Ok(val) = std::env::var("CREWBOARD_ALLOW_ASSIGNMENT")
            && let Ok(b) = val.parse::<bool>()
        {
            config.tasks.allow_assignment = b;
        }

        config
    }
}
