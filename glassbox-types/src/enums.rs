use serde::{Deserialize, Serialize};

/// The reason why token generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    FinishReasonUnspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Other,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    /// Values added to the API after this enum was written.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_parses_known_and_unknown_values() {
        let reason: FinishReason = serde_json::from_str("\"MAX_TOKENS\"").unwrap();
        assert_eq!(reason, FinishReason::MaxTokens);

        let reason: FinishReason = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(reason, FinishReason::Unknown);
    }
}
