use serde::{Deserialize, Deserializer, Serialize};

/// Identifier for an agent tracked on the dashboard. The set of valid ids is
/// fixed at startup by the roster.
pub type AgentId = String;

/// Closed set of agent statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Online,
    #[default]
    Offline,
    Idle,
    Busy,
}

impl StatusKind {
    /// Case-insensitive parse. Anything outside the closed set is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            "idle" => Some(Self::Idle),
            "busy" => Some(Self::Busy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Idle => "idle",
            Self::Busy => "busy",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown agent status: {s}")))
    }
}

/// Current status record for one known agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub status: StatusKind,
    /// Incremented by task assignment, never decremented by the core.
    pub task_count: u32,
    /// Percentage in [0, 100].
    pub productivity: u32,
}

/// Upper bound accepted for `task_count` in a bulk update.
pub const TASK_COUNT_LIMIT: u32 = 1000;

/// Upper bound accepted for `productivity` in a bulk update.
pub const PRODUCTIVITY_LIMIT: u32 = 100;

/// Partial status update with one optional field per recognized key.
///
/// Each field deserializes leniently: a value of the wrong type, a negative
/// count, or a status string outside the closed set becomes `None` instead
/// of failing the whole payload. Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdate {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<StatusKind>,
    #[serde(default, deserialize_with = "lenient")]
    pub task_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub productivity: Option<u32>,
}

impl AgentUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.task_count.is_none() && self.productivity.is_none()
    }
}

/// Deserialize a field as `Some(T)` if the value parses, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(StatusKind::parse("busy"), Some(StatusKind::Busy));
        assert_eq!(StatusKind::parse("BUSY"), Some(StatusKind::Busy));
        assert_eq!(StatusKind::parse("Online"), Some(StatusKind::Online));
        assert_eq!(StatusKind::parse("away"), None);
        assert_eq!(StatusKind::parse(""), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&StatusKind::Idle).unwrap(), "\"idle\"");
        assert_eq!(
            serde_json::to_string(&StatusKind::Offline).unwrap(),
            "\"offline\""
        );
    }

    #[test]
    fn status_deserialize_accepts_mixed_case() {
        let s: StatusKind = serde_json::from_str("\"BuSy\"").unwrap();
        assert_eq!(s, StatusKind::Busy);
        assert!(serde_json::from_str::<StatusKind>("\"gone\"").is_err());
    }

    #[test]
    fn update_parses_all_fields() {
        let json = r#"{"status": "busy", "task_count": 3, "productivity": 80}"#;
        let upd: AgentUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(upd.status, Some(StatusKind::Busy));
        assert_eq!(upd.task_count, Some(3));
        assert_eq!(upd.productivity, Some(80));
    }

    #[test]
    fn update_drops_invalid_fields_individually() {
        // Bad status string and negative count are dropped, productivity kept.
        let json = r#"{"status": "vanished", "task_count": -1, "productivity": 55}"#;
        let upd: AgentUpdate = serde_json::from_str(json).unwrap();
        assert!(upd.status.is_none());
        assert!(upd.task_count.is_none());
        assert_eq!(upd.productivity, Some(55));
    }

    #[test]
    fn update_drops_wrong_type_fields() {
        let json = r#"{"status": 7, "task_count": "many", "productivity": [1]}"#;
        let upd: AgentUpdate = serde_json::from_str(json).unwrap();
        assert!(upd.is_empty());
    }

    #[test]
    fn update_ignores_unrecognized_keys() {
        let json = r#"{"status": "idle", "mood": "cheerful"}"#;
        let upd: AgentUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(upd.status, Some(StatusKind::Idle));
        assert!(upd.task_count.is_none());
    }

    #[test]
    fn empty_update_is_empty() {
        let upd: AgentUpdate = serde_json::from_str("{}").unwrap();
        assert!(upd.is_empty());
    }

    #[test]
    fn default_agent_status() {
        let status = AgentStatus::default();
        assert_eq!(status.status, StatusKind::Offline);
        assert_eq!(status.task_count, 0);
        assert_eq!(status.productivity, 0);
    }
}
