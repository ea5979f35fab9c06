//! Typed content and credits records as returned by TMDB.
//!
//! A record's shape depends on its media kind, so [`ContentRecord`] is a tagged
//! union. Attributes the pipeline and the presenter read are typed fields;
//! everything else the provider returned is kept in each variant's `extra` map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TarjomeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            "person" => Ok(Self::Person),
            other => Err(format!("unknown media kind '{}', expected movie, tv or person", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SpokenLanguage {
    /// English name, then native name, then the ISO code
    pub fn display_name(&self) -> String {
        [&self.english_name, &self.name, &self.iso_639_1]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub release_date: Option<String>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub runtime: Option<u32>,
    pub original_language: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub homepage: Option<String>,
    #[serde(rename = "type")]
    pub series_type: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub in_production: Option<bool>,
    pub original_language: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: u64,
    pub name: Option<String>,
    pub biography: Option<String>,
    pub place_of_birth: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub known_for_department: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub popularity: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum ContentRecord {
    Movie(MovieDetails),
    Tv(TvDetails),
    Person(PersonDetails),
}

impl ContentRecord {
    /// Decode a raw TMDB details payload for the given kind
    pub fn from_value(kind: MediaKind, value: Value) -> Result<Self> {
        let record = match kind {
            MediaKind::Movie => Self::Movie(serde_json::from_value(value)?),
            MediaKind::Tv => Self::Tv(serde_json::from_value(value)?),
            MediaKind::Person => Self::Person(serde_json::from_value(value)?),
        };
        Ok(record)
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Movie(_) => MediaKind::Movie,
            Self::Tv(_) => MediaKind::Tv,
            Self::Person(_) => MediaKind::Person,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::Tv(t) => t.id,
            Self::Person(p) => p.id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.title.as_deref(),
            Self::Tv(t) => t.name.as_deref(),
            Self::Person(p) => p.name.as_deref(),
        }
    }

    /// Overview for titles, biography for people
    pub fn overview(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.overview.as_deref(),
            Self::Tv(t) => t.overview.as_deref(),
            Self::Person(p) => p.biography.as_deref(),
        }
    }

    pub fn genres(&self) -> &[Genre] {
        match self {
            Self::Movie(m) => &m.genres,
            Self::Tv(t) => &t.genres,
            Self::Person(_) => &[],
        }
    }

    pub fn production_companies(&self) -> &[ProductionCompany] {
        match self {
            Self::Movie(m) => &m.production_companies,
            Self::Tv(t) => &t.production_companies,
            Self::Person(_) => &[],
        }
    }

    pub fn spoken_languages(&self) -> &[SpokenLanguage] {
        match self {
            Self::Movie(m) => &m.spoken_languages,
            Self::Tv(t) => &t.spoken_languages,
            Self::Person(_) => &[],
        }
    }

    /// Attributes without a typed field
    pub fn extra(&self) -> &Map<String, Value> {
        match self {
            Self::Movie(m) => &m.extra,
            Self::Tv(t) => &t.extra,
            Self::Person(p) => &p.extra,
        }
    }
}

/// Top-level attributes offered to the translation pipeline, in pass order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Title,
    Overview,
    OriginalTitle,
    Status,
    PlaceOfBirth,
    Tagline,
    Homepage,
    ImdbId,
    Budget,
    Revenue,
    Runtime,
    EpisodeRunTime,
    NumberOfSeasons,
    NumberOfEpisodes,
    LastAirDate,
    FirstAirDate,
    InProduction,
    SeriesType,
    Birthday,
    KnownForDepartment,
    CreatedBy,
    Networks,
    ProductionCountries,
    Seasons,
    Keywords,
    ExternalIds,
}

impl ScalarField {
    pub const ALL: [ScalarField; 26] = [
        Self::Title,
        Self::Overview,
        Self::OriginalTitle,
        Self::Status,
        Self::PlaceOfBirth,
        Self::Tagline,
        Self::Homepage,
        Self::ImdbId,
        Self::Budget,
        Self::Revenue,
        Self::Runtime,
        Self::EpisodeRunTime,
        Self::NumberOfSeasons,
        Self::NumberOfEpisodes,
        Self::LastAirDate,
        Self::FirstAirDate,
        Self::InProduction,
        Self::SeriesType,
        Self::Birthday,
        Self::KnownForDepartment,
        Self::CreatedBy,
        Self::Networks,
        Self::ProductionCountries,
        Self::Seasons,
        Self::Keywords,
        Self::ExternalIds,
    ];

    /// Key under which the translation is stored in the translated record
    pub fn output_key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Overview => "overview",
            Self::OriginalTitle => "originalTitle",
            Self::Status => "status",
            Self::PlaceOfBirth => "placeOfBirth",
            Self::Tagline => "tagline",
            Self::Homepage => "homepage",
            Self::ImdbId => "imdbId",
            Self::Budget => "budget",
            Self::Revenue => "revenue",
            Self::Runtime => "runtime",
            Self::EpisodeRunTime => "episodeRunTime",
            Self::NumberOfSeasons => "numberOfSeasons",
            Self::NumberOfEpisodes => "numberOfEpisodes",
            Self::LastAirDate => "lastAirDate",
            Self::FirstAirDate => "firstAirDate",
            Self::InProduction => "inProduction",
            Self::SeriesType => "type",
            Self::Birthday => "birthday",
            Self::KnownForDepartment => "knownForDepartment",
            Self::CreatedBy => "createdBy",
            Self::Networks => "networks",
            Self::ProductionCountries => "productionCountries",
            Self::Seasons => "seasons",
            Self::Keywords => "keywords",
            Self::ExternalIds => "externalIds",
        }
    }

    /// Raw provider key for attributes kept in the untyped map
    fn extra_key(&self) -> Option<&'static str> {
        match self {
            Self::CreatedBy => Some("created_by"),
            Self::Networks => Some("networks"),
            Self::ProductionCountries => Some("production_countries"),
            Self::Seasons => Some("seasons"),
            Self::Keywords => Some("keywords"),
            Self::ExternalIds => Some("external_ids"),
            _ => None,
        }
    }

    /// The field's value in `record`, or `None` when absent or null
    pub fn value_in(&self, record: &ContentRecord) -> Option<Value> {
        use ContentRecord::{Movie, Person, Tv};

        if let Some(key) = self.extra_key() {
            return record.extra().get(key).filter(|v| !v.is_null()).cloned();
        }

        match (self, record) {
            (Self::Title, Movie(m)) => text(&m.title),
            (Self::Title, Tv(t)) => text(&t.name),
            (Self::Title, Person(p)) => text(&p.name),
            (Self::Overview, Movie(m)) => text(&m.overview),
            (Self::Overview, Tv(t)) => text(&t.overview),
            (Self::Overview, Person(p)) => text(&p.biography),
            (Self::OriginalTitle, Movie(m)) => text(&m.original_title),
            (Self::OriginalTitle, Tv(t)) => text(&t.original_name),
            (Self::OriginalTitle, Person(_)) => None,
            (Self::Status, Movie(m)) => text(&m.status),
            (Self::Status, Tv(t)) => text(&t.status),
            (Self::Status, Person(_)) => None,
            (Self::PlaceOfBirth, Person(p)) => text(&p.place_of_birth),
            (Self::PlaceOfBirth, _) => None,
            (Self::Tagline, Movie(m)) => text(&m.tagline),
            (Self::Tagline, Tv(t)) => text(&t.tagline),
            (Self::Tagline, Person(_)) => None,
            (Self::Homepage, Movie(m)) => text(&m.homepage),
            (Self::Homepage, Tv(t)) => text(&t.homepage),
            (Self::Homepage, Person(p)) => text(&p.homepage),
            (Self::ImdbId, Movie(m)) => text(&m.imdb_id),
            (Self::ImdbId, Person(p)) => text(&p.imdb_id),
            (Self::ImdbId, Tv(_)) => None,
            (Self::Budget, Movie(m)) => m.budget.map(Value::from),
            (Self::Revenue, Movie(m)) => m.revenue.map(Value::from),
            (Self::Runtime, Movie(m)) => m.runtime.map(Value::from),
            (Self::Budget | Self::Revenue | Self::Runtime, _) => None,
            (Self::EpisodeRunTime, Tv(t)) if !t.episode_run_time.is_empty() => {
                Some(Value::from(t.episode_run_time.clone()))
            }
            (Self::NumberOfSeasons, Tv(t)) => t.number_of_seasons.map(Value::from),
            (Self::NumberOfEpisodes, Tv(t)) => t.number_of_episodes.map(Value::from),
            (Self::LastAirDate, Tv(t)) => text(&t.last_air_date),
            (Self::FirstAirDate, Tv(t)) => text(&t.first_air_date),
            (Self::InProduction, Tv(t)) => t.in_production.map(Value::Bool),
            (Self::SeriesType, Tv(t)) => text(&t.series_type),
            (
                Self::EpisodeRunTime
                | Self::NumberOfSeasons
                | Self::NumberOfEpisodes
                | Self::LastAirDate
                | Self::FirstAirDate
                | Self::InProduction
                | Self::SeriesType,
                _,
            ) => None,
            (Self::Birthday, Person(p)) => text(&p.birthday),
            (Self::KnownForDepartment, Person(p)) => text(&p.known_for_department),
            (Self::Birthday | Self::KnownForDepartment, _) => None,
            (
                Self::CreatedBy
                | Self::Networks
                | Self::ProductionCountries
                | Self::Seasons
                | Self::Keywords
                | Self::ExternalIds,
                _,
            ) => None,
        }
    }
}

fn text(value: &Option<String>) -> Option<Value> {
    value.as_ref().map(|s| Value::String(s.clone()))
}

/// Reference from a credit to the title it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub media_type: MediaKind,
    pub id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    /// Person name, or the title for a person's movie credits
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaKind>,
}

impl CastMember {
    pub fn media_ref(&self) -> Option<MediaRef> {
        self.media_type.map(|media_type| MediaRef { media_type, id: self.id })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditsRecord {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<MediaKind>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

impl SearchResult {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().or(self.name.as_deref()).unwrap_or("Unknown")
    }

    /// Movie release date or first air date, whichever is set and non-empty
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.first_air_date.as_deref().filter(|d| !d.is_empty()))
    }
}

/// Reject an id that cannot address a TMDB record
pub fn validate_id(id: u64) -> Result<u64> {
    if id == 0 {
        return Err(TarjomeError::Retrieval("content id must be positive".to_string()));
    }
    Ok(id)
}
