use serde::{Deserialize, Serialize};

use crate::types::SearchMatch;

/// Transferable representation of a match, e.g. for drag-and-drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPayload {
    pub mime_type: String,
    pub data: String,
}

impl MatchPayload {
    /// Plain-text payload.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            mime_type: "text/plain".to_owned(),
            data: data.into(),
        }
    }

    /// Encode the whole match as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the match fails to serialize.
    pub fn from_match(matched: &SearchMatch) -> serde_json::Result<Self> {
        Ok(Self {
            mime_type: "application/json".to_owned(),
            data: serde_json::to_string(matched)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchType;

    #[test]
    fn json_payload_round_trips_the_match() {
        let matched = SearchMatch::new("m1", "apps", "Calculator")
            .with_category("Applications")
            .with_type(MatchType::Exact)
            .with_relevance(0.75);

        let payload = MatchPayload::from_match(&matched).expect("serialize match");
        assert_eq!(payload.mime_type, "application/json");

        let decoded: SearchMatch = serde_json::from_str(&payload.data).expect("decode match");
        assert_eq!(decoded, matched);
    }

    #[test]
    fn text_payload_uses_plain_mime_type() {
        let payload = MatchPayload::text("Calculator");
        assert_eq!(payload.mime_type, "text/plain");
        assert_eq!(payload.data, "Calculator");
    }
}
