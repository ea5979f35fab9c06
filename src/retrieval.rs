use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{Credentials, RetrievalConfig};
use crate::content::{ContentRecord, CreditsRecord, MediaKind, SearchResult, SearchResults, validate_id};
use crate::error::{CredentialKind, Result, TarjomeError};

/// Source of content records: search and detail fetch
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults>;

    async fn fetch_details(&self, kind: MediaKind, id: u64) -> Result<(ContentRecord, CreditsRecord)>;
}

/// Client for the TMDB v3 API
pub struct TmdbClient {
    client: Client,
    config: RetrievalConfig,
    token: Option<String>,
}

impl TmdbClient {
    pub fn new(config: RetrievalConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let token = credentials.require(CredentialKind::Retrieval).ok().map(str::to_string);
        Ok(Self { client, config, token })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or(TarjomeError::MissingCredential(CredentialKind::Retrieval))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token()?)
            .query(query)
            .send()
            .await
            .map_err(|e| TarjomeError::Retrieval(format!("Error fetching data: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TarjomeError::Retrieval(format!("HTTP error! status: {}", status.as_u16())));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TarjomeError::Retrieval(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ContentSource for TmdbClient {
    async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TarjomeError::EmptyQuery);
        }
        self.token()?;

        let params = [
            ("query", query.to_string()),
            ("include_adult", self.config.include_adult.to_string()),
            ("language", self.config.language.clone()),
            ("page", "1".to_string()),
        ];
        let results: SearchResults = self.get("search/multi", &params).await?;
        info!("Found {} results for \"{}\"", results.total_results, query);
        Ok(results)
    }

    async fn fetch_details(&self, kind: MediaKind, id: u64) -> Result<(ContentRecord, CreditsRecord)> {
        let id = validate_id(id)?;
        self.token()?;

        let append = match kind {
            MediaKind::Movie => "keywords,external_ids,release_dates,alternative_titles",
            MediaKind::Tv => "keywords,external_ids,content_ratings,alternative_titles",
            MediaKind::Person => "external_ids",
        };
        let params = [
            ("language", self.config.language.clone()),
            ("append_to_response", append.to_string()),
        ];
        let details: Value = self
            .get(&format!("{}/{}", kind, id), &params)
            .await
            .map_err(|e| match e {
                TarjomeError::Retrieval(msg) => {
                    TarjomeError::Retrieval(format!("Failed to fetch content details: {}", msg))
                }
                other => other,
            })?;
        let record = ContentRecord::from_value(kind, details)?;

        let credits_path = match kind {
            MediaKind::Person => format!("person/{}/combined_credits", id),
            _ => format!("{}/{}/credits", kind, id),
        };
        // details are still usable without credits
        let credits = match self.get::<CreditsRecord>(&credits_path, &[]).await {
            Ok(credits) => credits,
            Err(e) => {
                warn!("Failed to fetch credits for {} {}: {}", kind, id, e);
                CreditsRecord::default()
            }
        };

        Ok((record, credits))
    }
}

/// Ordering for search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first; results without a date go last
    #[default]
    ReleaseDate,
    /// Most popular first
    Popularity,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "release-date" | "date" => Ok(Self::ReleaseDate),
            "popularity" => Ok(Self::Popularity),
            other => Err(format!("unknown sort order '{}', expected release-date or popularity", other)),
        }
    }
}

pub fn sort_results(results: &mut [SearchResult], order: SortOrder) {
    match order {
        SortOrder::ReleaseDate => {
            let date = |r: &SearchResult| r.date().and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            results.sort_by(|a, b| date(b).cmp(&date(a)));
        }
        SortOrder::Popularity => {
            results.sort_by(|a, b| {
                let (pa, pb) = (a.popularity.unwrap_or(0.0), b.popularity.unwrap_or(0.0));
                pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
            });
        }
    }
}
