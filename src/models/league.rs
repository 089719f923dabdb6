//! Ranked league standing model.

use serde::{Deserialize, Serialize};

/// A summoner's standing in one ranked queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueEntry {
    /// Queue identifier (e.g., "RANKED_SOLO_5x5")
    pub queue_type: String,

    /// Tier (e.g., "MASTER", "GOLD")
    pub tier: String,

    /// Division inside the tier (e.g., "I", "IV")
    pub rank: String,

    pub wins: u32,
    pub losses: u32,

    /// Derived from wins and losses at construction.
    pub win_rate: f64,
}

impl LeagueEntry {
    /// Create a new entry, deriving the win rate.
    pub fn new(queue_type: String, tier: String, rank: String, wins: u32, losses: u32) -> Self {
        Self {
            queue_type,
            tier,
            rank,
            wins,
            losses,
            win_rate: win_rate(wins, losses),
        }
    }
}

/// Win rate as a fraction (0.0 to 1.0).
///
/// Returns 0.0 when no games have been played.
pub fn win_rate(wins: u32, losses: u32) -> f64 {
    let total = u64::from(wins) + u64::from(losses);
    if total == 0 {
        0.0
    } else {
        f64::from(wins) / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(wins: u32, losses: u32) -> LeagueEntry {
        LeagueEntry::new(
            "RANKED_SOLO_5x5".to_string(),
            "GOLD".to_string(),
            "II".to_string(),
            wins,
            losses,
        )
    }

    #[test]
    fn test_win_rate() {
        let league = entry(7, 3);
        assert!((league.win_rate - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_win_rate_no_games() {
        let league = entry(0, 0);
        assert_eq!(league.win_rate, 0.0);
        assert!(!league.win_rate.is_nan());
    }

    #[test]
    fn test_win_rate_all_losses() {
        assert_eq!(win_rate(0, 12), 0.0);
        assert_eq!(win_rate(12, 0), 1.0);
    }

    #[test]
    fn test_win_rate_no_overflow() {
        let rate = win_rate(u32::MAX, u32::MAX);
        assert!((rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_league_serialization() {
        let league = entry(7, 3);
        let json = serde_json::to_value(&league).unwrap();

        assert_eq!(json["queue_type"], "RANKED_SOLO_5x5");
        assert_eq!(json["wins"], 7);
        assert!(json["win_rate"].is_f64());
    }
}
