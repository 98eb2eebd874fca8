pub mod agent;
pub mod events;
pub mod roster;
pub mod task;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::agent::{AgentUpdate, StatusKind};
    use crate::roster::{AgentProfile, Roster};

    /// Build a roster from bare ids, with generated display metadata.
    pub fn make_roster(ids: &[&str]) -> Roster {
        Roster {
            agents: ids
                .iter()
                .map(|id| AgentProfile {
                    id: (*id).to_string(),
                    display_name: format!("Agent {id}"),
                    emoji: "🤖".to_string(),
                    color: "#888888".to_string(),
                })
                .collect(),
        }
    }

    /// Partial update that only sets the status field.
    pub fn status_update(kind: StatusKind) -> AgentUpdate {
        AgentUpdate {
            status: Some(kind),
            ..AgentUpdate::default()
        }
    }

    /// Partial update that only sets the productivity field.
    pub fn productivity_update(value: u32) -> AgentUpdate {
        AgentUpdate {
            productivity: Some(value),
            ..AgentUpdate::default()
        }
    }
}
