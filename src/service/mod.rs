//! Current-match aggregation.
//!
//! Resolves the requesting summoner and their active match, then enriches
//! every participant concurrently:
//! 1. Requester profile by name (fatal on error)
//! 2. Active match by requester id (fatal on error)
//! 3. One task per participant: profile by id, then league entries
//! 4. Join all tasks and assemble whatever was enriched

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::models::{AggregatedMatch, EnrichedSummoner, LeagueEntry};
use crate::upstream::{ParticipantDto, SummonerProvider, UpstreamError};

/// Default number of participant lookups in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Outcome of enriching a single participant.
#[derive(Debug)]
pub enum ParticipantOutcome {
    Enriched(EnrichedSummoner),
    ProfileFailed {
        summoner_id: String,
        error: UpstreamError,
    },
    LeaguesFailed {
        summoner_id: String,
        error: UpstreamError,
    },
}

/// Aggregates live match data from a [`SummonerProvider`].
#[derive(Clone)]
pub struct MatchService {
    provider: Arc<dyn SummonerProvider>,
    permits: Arc<Semaphore>,
}

impl MatchService {
    /// Create a service allowing [`DEFAULT_MAX_CONCURRENCY`] participant lookups at once.
    pub fn new(provider: Arc<dyn SummonerProvider>) -> Self {
        Self::with_concurrency(provider, DEFAULT_MAX_CONCURRENCY)
    }

    /// Create a service with a custom fan-out bound. Zero is treated as one.
    pub fn with_concurrency(provider: Arc<dyn SummonerProvider>, max_concurrency: usize) -> Self {
        Self {
            provider,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Find the match `summoner_name` is currently playing, with every
    /// participant's league standings.
    ///
    /// Errors resolving the requester or their match are returned as-is.
    /// Participants that cannot be enriched are left out of the result and
    /// counted in [`AggregatedMatch::dropped`].
    pub async fn find_current_match(
        &self,
        region: &str,
        summoner_name: &str,
    ) -> Result<AggregatedMatch, UpstreamError> {
        let start = Instant::now();

        let requester = self.provider.summoner_by_name(region, summoner_name).await?;
        let active = self.provider.active_match(region, &requester.id).await?;
        let participants = active.participants.len();

        let outcomes = self.enrich_participants(region, active.participants).await;

        let mut summoners = Vec::with_capacity(participants);
        for outcome in outcomes {
            match outcome {
                ParticipantOutcome::Enriched(summoner) => summoners.push(summoner),
                ParticipantOutcome::ProfileFailed { summoner_id, error } => {
                    warn!("Dropping participant {}: {}", summoner_id, error);
                }
                // League failures are dropped without a log line.
                ParticipantOutcome::LeaguesFailed { .. } => {}
            }
        }

        let aggregated = AggregatedMatch::new(summoners, participants);
        info!(
            "Resolved match for {} in {}: {}/{} participants in {:.2}s",
            summoner_name,
            region,
            aggregated.summoners.len(),
            participants,
            start.elapsed().as_secs_f64()
        );

        Ok(aggregated)
    }

    /// Fan out one task per participant and wait for all of them.
    pub async fn enrich_participants(
        &self,
        region: &str,
        participants: Vec<ParticipantDto>,
    ) -> Vec<ParticipantOutcome> {
        let mut tasks = JoinSet::new();
        for participant in participants {
            let provider = Arc::clone(&self.provider);
            let permits = Arc::clone(&self.permits);
            let region = region.to_string();
            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await.ok();
                enrich_participant(provider.as_ref(), &region, participant).await
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Participant task failed: {}", e),
            }
        }
        debug!("Collected {} participant outcomes", outcomes.len());
        outcomes
    }
}

/// Resolve one participant's profile, then their league entries.
pub async fn enrich_participant(
    provider: &dyn SummonerProvider,
    region: &str,
    participant: ParticipantDto,
) -> ParticipantOutcome {
    let profile = match provider.summoner_by_id(region, &participant.summoner_id).await {
        Ok(profile) => profile,
        Err(error) => {
            return ParticipantOutcome::ProfileFailed {
                summoner_id: participant.summoner_id,
                error,
            }
        }
    };

    let leagues = match provider.leagues(region, &profile.id).await {
        Ok(leagues) => leagues,
        Err(error) => {
            return ParticipantOutcome::LeaguesFailed {
                summoner_id: participant.summoner_id,
                error,
            }
        }
    };

    ParticipantOutcome::Enriched(EnrichedSummoner::new(
        profile.id,
        profile.name,
        profile.level,
        participant.team_id,
        leagues.into_iter().map(LeagueEntry::from).collect(),
    ))
}
