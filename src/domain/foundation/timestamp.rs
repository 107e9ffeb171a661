//! UTC instants for plan records and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When something happened. Serializes as RFC 3339 and orders by time, which
/// is what the stores sort creation dates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_is_rfc3339() {
        let json = "\"2026-01-05T07:00:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), json);
    }

    #[test]
    fn later_instants_sort_after_earlier_ones() {
        let monday: Timestamp = serde_json::from_str("\"2026-01-05T07:00:00Z\"").unwrap();
        let thursday: Timestamp = serde_json::from_str("\"2026-01-08T07:00:00Z\"").unwrap();

        let mut created = vec![thursday, monday];
        created.sort();
        assert_eq!(created, vec![monday, thursday]);
    }
}
