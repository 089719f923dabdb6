//! Enriched summoner model.

use serde::{Deserialize, Serialize};

use super::LeagueEntry;

/// A match participant joined with their profile and league standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSummoner {
    /// Upstream summoner id
    pub id: String,

    /// Display name
    pub name: String,

    /// Summoner level
    pub level: u32,

    /// Team the summoner plays on in the active match
    pub team_id: i64,

    /// League entries in the order the upstream returned them
    pub leagues: Vec<LeagueEntry>,
}

impl EnrichedSummoner {
    /// Create a new enriched summoner.
    pub fn new(
        id: String,
        name: String,
        level: u32,
        team_id: i64,
        leagues: Vec<LeagueEntry>,
    ) -> Self {
        Self {
            id,
            name,
            level,
            team_id,
            leagues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summoner_creation() {
        let summoner = EnrichedSummoner::new(
            "abc".to_string(),
            "xNibe".to_string(),
            18,
            100,
            vec![LeagueEntry::new(
                "RANKED_FLEX_SR".to_string(),
                "SILVER".to_string(),
                "I".to_string(),
                4,
                4,
            )],
        );

        assert_eq!(summoner.team_id, 100);
        assert_eq!(summoner.leagues.len(), 1);
    }

    #[test]
    fn test_summoner_unranked() {
        let summoner =
            EnrichedSummoner::new("abc".to_string(), "n".to_string(), 1, 200, Vec::new());

        let json = serde_json::to_value(&summoner).unwrap();
        assert_eq!(json["team_id"], 200);
        assert!(json["leagues"].as_array().unwrap().is_empty());
    }
}
