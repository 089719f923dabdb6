//! Upstream platform API access.
//!
//! Every lookup goes through the same pipeline: cache check, request against
//! the region host, status classification, retry on rate limiting, and cache
//! population on success. The [`SummonerProvider`] trait is the seam the
//! match service depends on.

mod client;
mod dto;
mod retry;

pub use client::*;
pub use dto::*;
pub use retry::*;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Kind of upstream resource a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Summoner,
    Match,
    Leagues,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Summoner => write!(f, "summoner"),
            Resource::Match => write!(f, "match"),
            Resource::Leagues => write!(f, "leagues"),
        }
    }
}

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("credential may be expired")]
    Auth,

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("something went wrong")]
    Upstream { status: u16 },

    #[error("Invalid {resource} response: {message}")]
    Decode { resource: Resource, message: String },

    #[error("Upstream request failed: {0}")]
    Transport(String),
}

impl UpstreamError {
    /// Only rate limiting is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UpstreamError::RateLimited)
    }
}

/// Lookups the match service needs from the upstream platform.
#[async_trait]
pub trait SummonerProvider: Send + Sync {
    /// Resolve a summoner profile by display name.
    async fn summoner_by_name(&self, region: &str, name: &str)
        -> Result<SummonerDto, UpstreamError>;

    /// Resolve the match a summoner is currently playing.
    async fn active_match(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<ActiveMatchDto, UpstreamError>;

    /// Resolve a summoner profile by id.
    async fn summoner_by_id(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<SummonerDto, UpstreamError>;

    /// Resolve a summoner's ranked league entries.
    async fn leagues(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntryDto>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            UpstreamError::NotFound(Resource::Summoner).to_string(),
            "summoner not found"
        );
        assert_eq!(
            UpstreamError::NotFound(Resource::Match).to_string(),
            "match not found"
        );
        assert_eq!(
            UpstreamError::NotFound(Resource::Leagues).to_string(),
            "leagues not found"
        );
    }

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(UpstreamError::RateLimited.is_retryable());
        assert!(!UpstreamError::Auth.is_retryable());
        assert!(!UpstreamError::NotFound(Resource::Match).is_retryable());
        assert!(!UpstreamError::Upstream { status: 500 }.is_retryable());
        assert!(!UpstreamError::Transport("timeout".to_string()).is_retryable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(UpstreamError::Auth.to_string(), "credential may be expired");
        assert_eq!(
            UpstreamError::Upstream { status: 502 }.to_string(),
            "something went wrong"
        );
    }
}
