use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for an event, carrying stream metadata.
///
/// This is the unit kept in an aggregate's history.
///
/// - **Append-only**: `sequence_number` increases by one per event, starting at 1.
/// - `payload` is the domain event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    /// Position in the aggregate stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, sequence_number: u64, payload: E) -> Self {
        Self {
            event_id,
            sequence_number,
            payload,
        }
    }

    /// Wrap `payload` with a fresh time-ordered (UUIDv7) event id.
    pub fn next(sequence_number: u64, payload: E) -> Self {
        Self::new(Uuid::now_v7(), sequence_number, payload)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_assigns_distinct_ids() {
        let a = EventEnvelope::next(1, "opened");
        let b = EventEnvelope::next(2, "changed");
        assert_ne!(a.event_id(), b.event_id());
        assert_eq!(a.sequence_number(), 1);
        assert_eq!(b.into_payload(), "changed");
    }

    #[test]
    fn envelope_serializes_with_payload() {
        let envelope = EventEnvelope::new(Uuid::nil(), 7, 42u32);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["sequence_number"], 7);
        assert_eq!(json["payload"], 42);

        let back: EventEnvelope<u32> = serde_json::from_value(json).unwrap();
        assert_eq!(back, envelope);
    }
}
