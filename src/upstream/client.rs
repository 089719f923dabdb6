//! HTTP client for the regional upstream hosts.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

use super::{
    ActiveMatchDto, LeagueEntryDto, Resource, RetryPolicy, SummonerDto, SummonerProvider,
    UpstreamError,
};
use crate::cache::Cache;

/// Header carrying the static API token.
pub const TOKEN_HEADER: &str = "X-Riot-Token";

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Region code to base URL
    pub hosts: BTreeMap<String, String>,

    /// Request timeout
    pub timeout: Duration,

    /// Retry behaviour on rate limiting
    pub retry: RetryPolicy,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: BTreeMap::new(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            user_agent: format!("match-lens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// One of the four upstream lookups.
#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    SummonerByName(&'a str),
    ActiveMatch(&'a str),
    SummonerById(&'a str),
    Leagues(&'a str),
}

impl Lookup<'_> {
    fn resource(&self) -> Resource {
        match self {
            Lookup::SummonerByName(_) | Lookup::SummonerById(_) => Resource::Summoner,
            Lookup::ActiveMatch(_) => Resource::Match,
            Lookup::Leagues(_) => Resource::Leagues,
        }
    }

    fn cache_key(&self, region: &str) -> String {
        match self {
            Lookup::SummonerByName(name) => format!("summoner_by_name_{}_{}", region, name),
            Lookup::ActiveMatch(id) => format!("match_by_summoner_id_{}_{}", region, id),
            Lookup::SummonerById(id) => format!("summoner_by_id_{}_{}", region, id),
            Lookup::Leagues(id) => format!("league_by_summoner_id_{}_{}", region, id),
        }
    }

    fn path_segments(&self) -> Vec<&str> {
        match *self {
            Lookup::SummonerByName(name) => {
                vec!["lol", "summoner", "v4", "summoners", "by-name", name]
            }
            Lookup::ActiveMatch(id) => {
                vec!["lol", "spectator", "v4", "active-games", "by-summoner", id]
            }
            Lookup::SummonerById(id) => vec!["lol", "summoner", "v4", "summoners", id],
            Lookup::Leagues(id) => vec!["lol", "league", "v4", "entries", "by-summoner", id],
        }
    }
}

/// Upstream client with response caching and rate-limit retries.
pub struct UpstreamClient {
    client: Client,
    token: String,
    hosts: BTreeMap<String, String>,
    cache: Arc<dyn Cache>,
    retry: RetryPolicy,
}

impl UpstreamClient {
    /// Create a new client. The token must not be empty.
    pub fn new(
        config: ClientConfig,
        token: impl Into<String>,
        cache: Arc<dyn Cache>,
    ) -> Result<Self, UpstreamError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(UpstreamError::Configuration(
                "upstream token should exist".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("match-lens")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| UpstreamError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            token,
            hosts: config.hosts,
            cache,
            retry: config.retry,
        })
    }

    /// Regions this client can reach.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Build the request URL, refusing regions without a host.
    fn url_for(&self, region: &str, lookup: &Lookup<'_>) -> Result<Url, UpstreamError> {
        let host = self
            .hosts
            .get(region)
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                UpstreamError::Configuration(format!("no host configured for region {:?}", region))
            })?;

        let mut url = Url::parse(host).map_err(|e| {
            UpstreamError::Configuration(format!("invalid host for region {}: {}", region, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                UpstreamError::Configuration(format!("host for region {} cannot be a base", region))
            })?
            .pop_if_empty()
            .extend(lookup.path_segments());

        Ok(url)
    }

    /// Cached, retried lookup.
    async fn fetch<T>(&self, region: &str, lookup: Lookup<'_>) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned + Serialize,
    {
        let key = lookup.cache_key(region);
        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    debug!("Serving {} from cache", key);
                    return Ok(value);
                }
                Err(e) => warn!("Ignoring unreadable cache entry {}: {}", key, e),
            }
        }

        let url = self.url_for(region, &lookup)?;
        let resource = lookup.resource();
        let value: T = self.retry.run(|| self.request(&url, resource)).await?;

        match serde_json::to_value(&value) {
            Ok(json) => self.cache.set(&key, json).await,
            Err(e) => warn!("Not caching {}: {}", key, e),
        }

        Ok(value)
    }

    /// Single GET, classified by status code.
    async fn request<T: DeserializeOwned>(
        &self,
        url: &Url,
        resource: Resource,
    ) -> Result<T, UpstreamError> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(UpstreamError::Auth);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound(resource));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "Error when requested {}. Status {} - Response {}",
                url,
                status.as_u16(),
                body
            );
            return Err(UpstreamError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            resource,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SummonerProvider for UpstreamClient {
    async fn summoner_by_name(
        &self,
        region: &str,
        name: &str,
    ) -> Result<SummonerDto, UpstreamError> {
        self.fetch(region, Lookup::SummonerByName(name)).await
    }

    async fn active_match(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<ActiveMatchDto, UpstreamError> {
        self.fetch(region, Lookup::ActiveMatch(summoner_id)).await
    }

    async fn summoner_by_id(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<SummonerDto, UpstreamError> {
        self.fetch(region, Lookup::SummonerById(summoner_id)).await
    }

    async fn leagues(
        &self,
        region: &str,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntryDto>, UpstreamError> {
        self.fetch(region, Lookup::Leagues(summoner_id)).await
    }
}
