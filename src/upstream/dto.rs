//! Response shapes of the upstream API.

use serde::{Deserialize, Serialize};

use crate::models::LeagueEntry;

/// Summoner profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonerDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "summonerLevel", alias = "level")]
    pub level: u32,
}

/// One player in an active match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub summoner_id: String,
    pub team_id: i64,
}

/// A match currently in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveMatchDto {
    pub participants: Vec<ParticipantDto>,
}

/// Ranked standing in one queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub wins: u32,
    pub losses: u32,
}

impl From<LeagueEntryDto> for LeagueEntry {
    fn from(dto: LeagueEntryDto) -> Self {
        LeagueEntry::new(dto.queue_type, dto.tier, dto.rank, dto.wins, dto.losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summoner_from_upstream_json() {
        let json = r#"{
            "id": "flB50ZlPKdPOKSomx9Yep5FHrP-CGRdnkKHoH9nbhcLY_JxX",
            "accountId": "ignored",
            "name": "xNibe",
            "profileIconId": 4661,
            "summonerLevel": 18
        }"#;

        let summoner: SummonerDto = serde_json::from_str(json).unwrap();
        assert_eq!(summoner.name, "xNibe");
        assert_eq!(summoner.level, 18);
    }

    #[test]
    fn test_summoner_level_alias() {
        let summoner: SummonerDto =
            serde_json::from_str(r#"{"id": "a", "name": "b", "level": 7}"#).unwrap();
        assert_eq!(summoner.level, 7);
    }

    #[test]
    fn test_active_match_from_upstream_json() {
        let json = r#"{
            "gameId": 4242,
            "gameMode": "CLASSIC",
            "participants": [
                {"summonerId": "one", "teamId": 100, "championId": 1},
                {"summonerId": "two", "teamId": 200, "championId": 2}
            ]
        }"#;

        let active: ActiveMatchDto = serde_json::from_str(json).unwrap();
        assert_eq!(active.participants.len(), 2);
        assert_eq!(active.participants[1].team_id, 200);
    }

    #[test]
    fn test_league_entry_into_model() {
        let json = r#"[{
            "leagueId": "x",
            "queueType": "RANKED_SOLO_5x5",
            "tier": "MASTER",
            "rank": "I",
            "leaguePoints": 120,
            "wins": 7,
            "losses": 3
        }]"#;

        let entries: Vec<LeagueEntryDto> = serde_json::from_str(json).unwrap();
        let league: LeagueEntry = entries.into_iter().next().unwrap().into();

        assert_eq!(league.tier, "MASTER");
        assert!((league.win_rate - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_participant_missing_field_is_rejected() {
        let result = serde_json::from_str::<ParticipantDto>(r#"{"teamId": 100}"#);
        assert!(result.is_err());
    }
}
