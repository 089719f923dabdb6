//! Aggregated live match model.

use serde::{Deserialize, Serialize};

use super::EnrichedSummoner;

/// Result of a current-match lookup.
///
/// `summoners` is unordered: it reflects task completion order and must not
/// be relied upon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatedMatch {
    pub summoners: Vec<EnrichedSummoner>,

    /// Participants listed in the active match
    #[serde(default)]
    pub participants: usize,

    /// Participants that could not be enriched and are missing from `summoners`
    #[serde(default)]
    pub dropped: usize,
}

impl AggregatedMatch {
    /// Create a result from the enriched summoners and the participant count.
    pub fn new(summoners: Vec<EnrichedSummoner>, participants: usize) -> Self {
        let dropped = participants.saturating_sub(summoners.len());
        Self {
            summoners,
            participants,
            dropped,
        }
    }

    /// True when every participant was enriched.
    pub fn is_complete(&self) -> bool {
        self.dropped == 0
    }
}
