// SPDX-License-Identifier: PMPL-1.0-or-later
//! Chat message data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier
    pub id: String,
    /// Display name of the sender
    pub author: String,
    /// Message text
    pub content: String,
    /// Server-assigned creation time
    pub timestamp: DateTime<Utc>,
}

/// Client submission for a new message.
///
/// Both fields are optional so that a missing field is reported the same
/// way as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let payload: NewMessage = serde_json::from_str(r#"{"author": "alice"}"#).unwrap();
        assert_eq!(payload.author.as_deref(), Some("alice"));
        assert!(payload.content.is_none());
    }

    #[test]
    fn test_timestamp_serializes_as_rfc3339() {
        let message = Message {
            id: "abc".to_string(),
            author: "alice".to_string(),
            content: "hi".to_string(),
            timestamp: DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["timestamp"], "2026-01-02T03:04:05Z");
        assert_eq!(json["id"], "abc");
    }
}
