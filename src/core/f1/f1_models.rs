use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// One driver's line in a race classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub position: String,
    pub driver_code: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub team: String,
    pub status: String,
    pub points: String,
}

impl Classification {
    pub fn driver_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaceResult {
    pub race_name: String,
    pub classifications: Vec<Classification>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRace {
    pub round: u32,
    pub name: String,
    pub date: String,
    /// Start time as published, e.g. `13:00:00Z`. Older seasons have none.
    pub time: Option<String>,
    pub has_sprint: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverStanding {
    pub position: String,
    pub given_name: String,
    pub family_name: String,
    pub team: String,
    pub points: String,
}

/// Result of walking a whole season for one driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverSeason {
    pub lines: Vec<String>,
    pub races_found: usize,
}

#[derive(Debug, Error)]
pub enum F1Error {
    #[error("Season {0} is outside the supported range")]
    SeasonOutOfRange(i32),

    #[error("Round {0} is outside the supported range")]
    RoundOutOfRange(u32),

    #[error("Invalid driver code: {0}")]
    InvalidDriverCode(String),

    #[error("F1 API error: {0}")]
    Api(String),

    #[error("F1 API rate limit hit")]
    RateLimited { retry_after: Option<Duration> },
}

/// Source of F1 data. The production implementation talks to the Jolpica
/// (Ergast-compatible) API; `None`/empty results mean "the API has nothing".
#[async_trait]
pub trait F1DataSource: Send + Sync {
    async fn race_result(&self, season: i32, round: u32) -> Result<Option<RaceResult>, F1Error>;

    async fn season_calendar(&self, season: i32) -> Result<Option<Vec<CalendarRace>>, F1Error>;

    async fn driver_standings(&self, season: i32) -> Result<Vec<DriverStanding>, F1Error>;
}
