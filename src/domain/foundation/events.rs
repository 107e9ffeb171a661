//! Plan events and the envelope they travel in.
//!
//! Handlers build a typed event, wrap it with `to_envelope()` and hand the
//! envelope to the `EventPublisher`. Subscribers route on `event_type`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{DomainError, ErrorCode, Timestamp};

pub trait DomainEvent: Send + Sync {
    /// Versioned routing key, e.g. `mesocycle.superseded.v1`.
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> String;

    /// `Macrocycle`, `Mesocycle`, `Microcycle` or `Set`.
    fn aggregate_type(&self) -> &'static str;

    fn occurred_at(&self) -> Timestamp;

    fn event_id(&self) -> EventId;
}

/// Every serializable event can be enveloped.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        EventEnvelope::from_event(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Implements `DomainEvent` by naming the fields that carry each value.
///
/// ```ignore
/// domain_event!(
///     MicrocycleCreatedEvent,
///     event_type = "microcycle.created.v1",
///     aggregate_id = microcycle_id,
///     aggregate_type = "Microcycle",
///     occurred_at = created_at,
///     event_id = event_id
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event_name:ident,
        event_type = $event_type:expr,
        aggregate_id = $agg_id_field:ident,
        aggregate_type = $agg_type:expr,
        occurred_at = $occurred_field:ident,
        event_id = $event_id_field:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event_name {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn aggregate_id(&self) -> String {
                self.$agg_id_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $agg_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id_field.clone()
            }
        }
    };
}

pub use domain_event;

/// Per-event id; subscribers deduplicate on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation context attached to every envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// User who initiated the action that led to this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// What the bus carries: routing fields up front, the event itself as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,

    pub event_type: String,

    /// Taken from the `.vN` suffix of `event_type`.
    pub schema_version: u32,

    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,

    pub payload: JsonValue,

    pub metadata: EventMetadata,
}

impl EventEnvelope {
    pub fn from_event<T>(event: &T) -> Result<Self, DomainError>
    where
        T: DomainEvent + Serialize + ?Sized,
    {
        let event_type = event.event_type().to_string();
        let schema_version = Self::extract_version(&event_type);
        let payload = serde_json::to_value(event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {}: {}", event_type, e),
            )
        })?;

        Ok(Self {
            event_id: event.event_id(),
            event_type,
            schema_version,
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload,
            metadata: EventMetadata::default(),
        })
    }

    /// Extracts version number from the event_type suffix, defaulting to 1.
    pub(crate) fn extract_version(event_type: &str) -> u32 {
        event_type
            .rsplit_once(".v")
            .and_then(|(_, version_str)| version_str.parse::<u32>().ok())
            .unwrap_or(1)
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    /// The acting coach or student.
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.user_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct PlanTouched {
        event_id: EventId,
        plan_id: String,
        touched_at: Timestamp,
    }

    domain_event!(
        PlanTouched,
        event_type = "plan.touched.v2",
        aggregate_id = plan_id,
        aggregate_type = "Plan",
        occurred_at = touched_at,
        event_id = event_id
    );

    #[test]
    fn extract_version_reads_suffix_or_defaults() {
        assert_eq!(EventEnvelope::extract_version("mesocycle.superseded.v3"), 3);
        assert_eq!(EventEnvelope::extract_version("legacy.event"), 1);
    }

    #[test]
    fn to_envelope_copies_routing_fields() {
        let event = PlanTouched {
            event_id: EventId::new(),
            plan_id: "plan-1".to_string(),
            touched_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .unwrap()
            .with_correlation_id("corr")
            .with_user_id("coach-1");

        assert_eq!(envelope.event_type, "plan.touched.v2");
        assert_eq!(envelope.schema_version, 2);
        assert_eq!(envelope.aggregate_id, "plan-1");
        assert_eq!(envelope.aggregate_type, "Plan");
        assert_eq!(envelope.metadata.correlation_id.as_deref(), Some("corr"));

        assert_eq!(envelope.payload["plan_id"], "plan-1");
    }
}
