// F1 statistics, formatted for chat.
//
// The data source returns structured rows; this service validates the user's
// input and turns rows into the display lines the commands print.

use super::f1_models::{
    CalendarRace, Classification, DriverSeason, DriverStanding, F1DataSource, F1Error, RaceResult,
};
use super::status_map::{short_status, FINISHED};
use chrono::Datelike;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// The first world championship season.
pub const FIRST_SEASON: i32 = 1950;

/// Longest calendar so far. Raise this if the championship grows.
pub const MAX_ROUND: u32 = 24;

pub fn current_season() -> i32 {
    chrono::Utc::now().year()
}

pub fn validate_season(season: i32) -> Result<(), F1Error> {
    if (FIRST_SEASON..=current_season()).contains(&season) {
        Ok(())
    } else {
        Err(F1Error::SeasonOutOfRange(season))
    }
}

pub fn validate_round(round: u32) -> Result<(), F1Error> {
    if (1..=MAX_ROUND).contains(&round) {
        Ok(())
    } else {
        Err(F1Error::RoundOutOfRange(round))
    }
}

/// Driver codes are three letters (VER, HAM, ...). Returns the upper-cased code.
pub fn normalize_driver_code(code: &str) -> Result<String, F1Error> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(F1Error::InvalidDriverCode(code.to_string()))
    }
}

pub fn format_position(position: &str, emojis: bool) -> String {
    if emojis {
        match position {
            "1" => return "🥇".to_string(),
            "2" => return "🥈".to_string(),
            "3" => return "🥉".to_string(),
            _ => {}
        }
    }
    format!("{}.", position)
}

pub fn format_classification(entry: &Classification, emojis: bool) -> String {
    let position = format_position(&entry.position, emojis);
    let status = short_status(&entry.status);
    if status == FINISHED {
        format!("{} {} ({})", position, entry.driver_name(), entry.team)
    } else {
        format!(
            "{} {} ({}) - {}",
            position,
            entry.driver_name(),
            entry.team,
            status
        )
    }
}

pub fn format_calendar_race(race: &CalendarRace) -> String {
    let sprint = if race.has_sprint { " (Sprint)" } else { "" };
    match race.time.as_deref().map(short_time) {
        Some(time) => format!(
            "{}. {}{} - {} {} UTC",
            race.round, race.name, sprint, race.date, time
        ),
        None => format!("{}. {}{} - {} UTC", race.round, race.name, sprint, race.date),
    }
}

/// `13:00:00Z` -> `13:00`
fn short_time(time: &str) -> String {
    time.replace('Z', "").chars().take(5).collect()
}

pub fn format_standing(standing: &DriverStanding) -> String {
    format!(
        "{}. {} {} ({}) - {} pts.",
        standing.position, standing.given_name, standing.family_name, standing.team, standing.points
    )
}

/// Attempts per round before a rate-limited season walk gives up.
const RATE_LIMIT_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

pub struct F1Service<S: F1DataSource> {
    source: S,
    /// Season walks issue one request per round; only one runs at a time.
    driver_lookup: Mutex<()>,
}

impl<S: F1DataSource> F1Service<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            driver_lookup: Mutex::new(()),
        }
    }

    /// Returns the race name and one line per classified driver.
    pub async fn race_result(
        &self,
        season: i32,
        round: u32,
        emojis: bool,
    ) -> Result<Option<(String, Vec<String>)>, F1Error> {
        validate_season(season)?;
        validate_round(round)?;

        let Some(result) = self.source.race_result(season, round).await? else {
            return Ok(None);
        };
        if result.classifications.is_empty() {
            return Ok(None);
        }

        let lines = result
            .classifications
            .iter()
            .map(|entry| format_classification(entry, emojis))
            .collect();
        Ok(Some((result.race_name, lines)))
    }

    pub async fn season_calendar(&self, season: i32) -> Result<Option<Vec<String>>, F1Error> {
        validate_season(season)?;
        let races = self.source.season_calendar(season).await?;
        Ok(races.map(|races| races.iter().map(format_calendar_race).collect()))
    }

    /// Standings for a season. Out-of-range seasons simply have no standings.
    pub async fn driver_standings(&self, season: i32) -> Result<Vec<String>, F1Error> {
        if validate_season(season).is_err() {
            return Ok(Vec::new());
        }
        let standings = self.source.driver_standings(season).await?;
        Ok(standings.iter().map(format_standing).collect())
    }

    /// Claims the season-walk slot without waiting. `None` means someone else holds it.
    pub fn try_claim_driver_lookup(&self) -> Option<MutexGuard<'_, ()>> {
        self.driver_lookup.try_lock().ok()
    }

    /// Waits for the season-walk slot.
    pub async fn claim_driver_lookup(&self) -> MutexGuard<'_, ()> {
        self.driver_lookup.lock().await
    }

    /// Walks every round of `season` and reports how `driver_code` did.
    ///
    /// Callers must hold the guard from [`Self::claim_driver_lookup`] (or the
    /// `try_` variant) while this runs.
    pub async fn driver_season(
        &self,
        driver_code: &str,
        season: i32,
        show_not_started: bool,
    ) -> Result<DriverSeason, F1Error> {
        let code = normalize_driver_code(driver_code)?;
        validate_season(season)?;

        let Some(calendar) = self.source.season_calendar(season).await? else {
            return Ok(DriverSeason::default());
        };

        let mut summary = DriverSeason::default();
        for race in calendar {
            let result = self.round_result(season, race.round).await?;

            let entry = result.as_ref().and_then(|r| {
                r.classifications
                    .iter()
                    .find(|c| c.driver_code.as_deref() == Some(code.as_str()))
            });

            match entry {
                Some(entry) => {
                    summary.lines.push(format!(
                        "R{}: **P{}** at {} ({} pts)",
                        race.round, entry.position, race.name, entry.points
                    ));
                    summary.races_found += 1;
                }
                None if show_not_started => {
                    summary
                        .lines
                        .push(format!("R{}: {} - No Data/DNS", race.round, race.name));
                }
                None => {}
            }
        }

        Ok(summary)
    }

    /// One round of a season walk. Rate limits are waited out a few times;
    /// any other failure ends the walk.
    async fn round_result(&self, season: i32, round: u32) -> Result<Option<RaceResult>, F1Error> {
        let mut attempt = 1;
        loop {
            match self.source.race_result(season, round).await {
                Err(F1Error::RateLimited { retry_after }) if attempt < RATE_LIMIT_ATTEMPTS => {
                    let wait = retry_after.unwrap_or(DEFAULT_BACKOFF).min(MAX_BACKOFF);
                    tracing::info!(season, round, attempt, ?wait, "Rate limited, waiting");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
