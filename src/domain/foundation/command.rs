//! Who is acting, and under which correlation id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Passed to every handler next to the command or query.
///
/// `user_id` is the coach or student making the call. Handlers check it
/// against the macrocycle's coach and student, and stamp it on emitted events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub user_id: UserId,

    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// The caller's correlation id, or a fresh one when none was given.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach() -> UserId {
        UserId::new("coach-1").unwrap()
    }

    #[test]
    fn keeps_the_callers_correlation_id() {
        let metadata = CommandMetadata::new(coach()).with_correlation_id("req-42");
        assert_eq!(metadata.correlation_id(), "req-42");
    }

    #[test]
    fn missing_correlation_id_is_generated() {
        let metadata = CommandMetadata::new(coach());
        assert!(Uuid::parse_str(&metadata.correlation_id()).is_ok());
        assert!(serde_json::to_value(&metadata)
            .unwrap()
            .get("correlation_id")
            .is_none());
    }
}
