/*!
Persistence primitives for serializing/deserializing checkpoints (used by
the SQLite checkpointer and any future persistent backends).

Design Goals:
- Provide explicit serde-friendly structs decoupled from internal
  in-memory representations.
- Keep conversion logic localized (From / TryFrom impls) so the
  checkpointer code is lean and declarative.
- Round-trip exactly: optional fields stay optional, and a node name
  outside the closed enumeration is a hard error rather than a fallback.

This module intentionally does NOT perform I/O. It is pure data
transformation and (de)serialization glue.
*/

use serde::{Deserialize, Serialize};

use crate::{
    interrupt::Interrupt,
    runtimes::checkpointer::{Checkpoint, EngineStatus},
    state::ConversationState,
    types::NodeName,
    utils::json_ext::JsonSerializable,
};

/// Version stamp written into every persisted checkpoint.
pub const FORMAT_VERSION: u32 = 1;

/// Blanket implementation of JsonSerializable for all suitable types using
/// PersistenceError.
impl<T> JsonSerializable<PersistenceError> for T
where
    T: serde::Serialize + for<'de> serde::de::DeserializeOwned,
{
    fn to_json_string(&self) -> std::result::Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(|e| PersistenceError::Serde { source: e })
    }

    fn from_json_str(s: &str) -> std::result::Result<Self, PersistenceError> {
        serde_json::from_str(s).map_err(|e| PersistenceError::Serde { source: e })
    }
}

/// Full persisted checkpoint representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedCheckpoint {
    pub format_version: u32,
    pub session_id: String,
    pub step: u64,
    pub status: EngineStatus,
    pub state: ConversationState,
    /// Suspended node encoded via `NodeName::encode()`.
    #[serde(default)]
    pub suspended_at: Option<String>,
    #[serde(default)]
    pub interrupt: Option<Interrupt>,
    /// RFC3339 string form of creation time (keeps `chrono::DateTime` out of
    /// the serialized shape).
    pub created_at: String,
}

use miette::Diagnostic;
use thiserror::Error;

/// Bidirectional conversion and serialization errors for persistence models.
#[derive(Debug, Error, Diagnostic)]
pub enum PersistenceError {
    #[error("unsupported checkpoint format version: {found}")]
    #[diagnostic(
        code(confab::persistence::unsupported_version),
        help("The stored checkpoint was written by an incompatible build.")
    )]
    UnsupportedVersion { found: u32 },

    #[error("unknown persisted node name: {name}")]
    #[diagnostic(
        code(confab::persistence::unknown_node),
        help("Node names form a closed set; the stored checkpoint is corrupt or foreign.")
    )]
    UnknownNode { name: String },

    #[error("JSON serialization/deserialization failed: {source}")]
    #[diagnostic(
        code(confab::persistence::serde),
        help("Ensure the JSON structure matches the Persisted* types.")
    )]
    Serde {
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/* ---------- Checkpoint <-> PersistedCheckpoint Conversions ---------- */

impl From<&Checkpoint> for PersistedCheckpoint {
    fn from(cp: &Checkpoint) -> Self {
        PersistedCheckpoint {
            format_version: FORMAT_VERSION,
            session_id: cp.session_id.clone(),
            step: cp.step,
            status: cp.status,
            state: cp.state.clone(),
            suspended_at: cp.suspended_at.map(|n| n.encode().to_string()),
            interrupt: cp.interrupt.clone(),
            created_at: cp.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<PersistedCheckpoint> for Checkpoint {
    type Error = PersistenceError;

    fn try_from(p: PersistedCheckpoint) -> Result<Self> {
        if p.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: p.format_version,
            });
        }
        let suspended_at = match p.suspended_at {
            Some(name) => Some(
                NodeName::decode(&name).ok_or(PersistenceError::UnknownNode { name })?,
            ),
            None => None,
        };
        let created_at = chrono::DateTime::parse_from_rfc3339(&p.created_at)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now());
        Ok(Checkpoint {
            session_id: p.session_id,
            step: p.step,
            state: p.state,
            status: p.status,
            suspended_at,
            interrupt: p.interrupt,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UserIntent;

    fn sample_checkpoint() -> Checkpoint {
        let mut state = ConversationState::new_with_human_message("book a meeting");
        state.user_intent = Some(UserIntent::ScheduleMeeting);
        state.pending_prompt = Some("what time?".into());
        Checkpoint::suspended(
            "sess1",
            state,
            NodeName::SeekMoreInfo,
            Interrupt::seek_more_info("need info", "what time?"),
            3,
        )
    }

    #[test]
    /// Checkpoints survive the JSON round-trip exactly, including optional
    /// fields left unset.
    fn test_round_trip_preserves_everything() {
        let original = sample_checkpoint();
        let persisted = PersistedCheckpoint::from(&original);
        let json = persisted.to_json_string().unwrap();
        let reread = PersistedCheckpoint::from_json_str(&json).unwrap();
        let restored = Checkpoint::try_from(reread).unwrap();

        assert_eq!(restored.session_id, original.session_id);
        assert_eq!(restored.step, original.step);
        assert_eq!(restored.status, original.status);
        assert_eq!(restored.state, original.state);
        assert_eq!(restored.suspended_at, original.suspended_at);
        assert_eq!(restored.interrupt, original.interrupt);
        assert!(restored.state.operation_name.is_none());
    }

    #[test]
    /// Unknown persisted node names are an error, not a fallback.
    fn test_unknown_node_name_is_rejected() {
        let mut persisted = PersistedCheckpoint::from(&sample_checkpoint());
        persisted.suspended_at = Some("mystery_node".to_string());
        let err = Checkpoint::try_from(persisted).unwrap_err();
        assert!(matches!(err, PersistenceError::UnknownNode { .. }));
    }

    #[test]
    /// Foreign format versions are rejected up front.
    fn test_unsupported_version_is_rejected() {
        let mut persisted = PersistedCheckpoint::from(&sample_checkpoint());
        persisted.format_version = 99;
        let err = Checkpoint::try_from(persisted).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found: 99 }
        ));
    }
}
