// F1 data from the Jolpica API, which serves the old Ergast JSON format.
// See: https://github.com/jolpica/jolpica-f1

use crate::core::f1::{
    CalendarRace, Classification, DriverStanding, F1DataSource, F1Error, RaceResult,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

// =============================================================================
// ERGAST RESPONSE SHAPES
// =============================================================================
//
// Only the fields we read are modelled. Everything is optional because older
// seasons are missing plenty of them.

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct MrData {
    #[serde(rename = "RaceTable")]
    race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    standings_table: Option<StandingsTable>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RaceTable {
    #[serde(rename = "Races")]
    races: Vec<ApiRace>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiRace {
    round: String,
    #[serde(rename = "raceName")]
    race_name: String,
    date: String,
    time: Option<String>,
    #[serde(rename = "Sprint")]
    sprint: Option<serde_json::Value>,
    #[serde(rename = "Results")]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiResult {
    position: String,
    points: String,
    status: String,
    #[serde(rename = "Driver")]
    driver: ApiDriver,
    #[serde(rename = "Constructor")]
    constructor: ApiConstructor,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiDriver {
    code: Option<String>,
    #[serde(rename = "givenName")]
    given_name: String,
    #[serde(rename = "familyName")]
    family_name: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiConstructor {
    name: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StandingsTable {
    #[serde(rename = "StandingsLists")]
    standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StandingsList {
    #[serde(rename = "DriverStandings")]
    driver_standings: Vec<ApiStanding>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiStanding {
    position: Option<String>,
    #[serde(rename = "positionText")]
    position_text: Option<String>,
    points: String,
    #[serde(rename = "Driver")]
    driver: ApiDriver,
    #[serde(rename = "Constructors")]
    constructors: Vec<ApiConstructor>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_envelope(body: &str) -> Result<MrData, F1Error> {
    serde_json::from_str::<Envelope>(body)
        .map(|e| e.mr_data)
        .map_err(|e| F1Error::Api(format!("Unexpected response: {}", e)))
}

fn races(data: MrData) -> Vec<ApiRace> {
    data.race_table.map(|t| t.races).unwrap_or_default()
}

fn parse_race_result(body: &str) -> Result<Option<RaceResult>, F1Error> {
    let Some(race) = races(parse_envelope(body)?).into_iter().next() else {
        return Ok(None);
    };

    let classifications = race
        .results
        .into_iter()
        .map(|r| Classification {
            position: r.position,
            driver_code: r.driver.code,
            given_name: r.driver.given_name,
            family_name: r.driver.family_name,
            team: r.constructor.name,
            status: r.status,
            points: r.points,
        })
        .collect();

    Ok(Some(RaceResult {
        race_name: race.race_name,
        classifications,
    }))
}

fn parse_calendar(body: &str) -> Result<Option<Vec<CalendarRace>>, F1Error> {
    let races = races(parse_envelope(body)?);
    if races.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        races
            .into_iter()
            .filter_map(|race| {
                let round = race.round.parse::<u32>().ok()?;
                Some(CalendarRace {
                    round,
                    name: race.race_name,
                    date: race.date,
                    time: race.time,
                    has_sprint: race.sprint.is_some(),
                })
            })
            .collect(),
    ))
}

fn parse_standings(body: &str) -> Result<Vec<DriverStanding>, F1Error> {
    let data = parse_envelope(body)?;
    let Some(list) = data
        .standings_table
        .and_then(|t| t.standings_lists.into_iter().next())
    else {
        return Ok(Vec::new());
    };

    Ok(list
        .driver_standings
        .into_iter()
        .map(|s| DriverStanding {
            // Excluded drivers have no position, only "-" as text.
            position: s.position.or(s.position_text).unwrap_or_else(|| "-".to_string()),
            given_name: s.driver.given_name,
            family_name: s.driver.family_name,
            team: s
                .constructors
                .into_iter()
                .next()
                .map(|c| c.name)
                .unwrap_or_default(),
            points: s.points,
        })
        .collect())
}

// =============================================================================
// CLIENT
// =============================================================================

/// Jolpica allows roughly four requests per second in a burst.
const MIN_REQUEST_GAP: Duration = Duration::from_millis(260);

pub struct JolpicaClient {
    client: Client,
    base_url: String,
    last_request: Mutex<Option<Instant>>,
}

impl JolpicaClient {
    pub fn new() -> Result<Self, F1Error> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, F1Error> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("User-Agent", HeaderValue::from_static("PitlaneBot/0.3"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| F1Error::Api(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            last_request: Mutex::new(None),
        })
    }

    /// Spaces requests out so season walks stay under the burst limit.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_GAP {
                tokio::time::sleep(MIN_REQUEST_GAP - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// `Ok(None)` on 400/404; the API answers unknown seasons/rounds that way.
    async fn get(&self, path: &str) -> Result<Option<String>, F1Error> {
        let url = format!("{}/{}", self.base_url, path);
        self.pace().await;
        tracing::debug!(%url, "Jolpica request");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", "100")])
            .send()
            .await
            .map_err(|e| F1Error::Api(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after(response.headers());
            tracing::warn!(%url, ?retry_after, "Jolpica rate limit hit");
            return Err(F1Error::RateLimited { retry_after });
        }
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
            tracing::debug!(%url, status = status.as_u16(), "Jolpica has no data");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(F1Error::Api(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map(Some)
            .map_err(|e| F1Error::Api(e.to_string()))
    }

    async fn get_parsed<T, F>(&self, path: &str, parse: F) -> Result<Option<T>, F1Error>
    where
        F: FnOnce(&str) -> Result<T, F1Error>,
    {
        match self.get(path).await? {
            Some(body) => parse(&body).map(Some),
            None => Ok(None),
        }
    }
}

/// `Retry-After` in its delay-seconds form. HTTP dates are rare here and ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl F1DataSource for JolpicaClient {
    async fn race_result(&self, season: i32, round: u32) -> Result<Option<RaceResult>, F1Error> {
        let result = self
            .get_parsed(&format!("{}/{}/results.json", season, round), parse_race_result)
            .await?;
        Ok(result.flatten())
    }

    async fn season_calendar(&self, season: i32) -> Result<Option<Vec<CalendarRace>>, F1Error> {
        let calendar = self
            .get_parsed(&format!("{}.json", season), parse_calendar)
            .await?;
        Ok(calendar.flatten())
    }

    async fn driver_standings(&self, season: i32) -> Result<Vec<DriverStanding>, F1Error> {
        let standings = self
            .get_parsed(&format!("{}/driverStandings.json", season), parse_standings)
            .await?;
        Ok(standings.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::f1::F1Service;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const RESULTS: &str = r#"{
      "MRData": {
        "RaceTable": {
          "season": "2023",
          "round": "1",
          "Races": [{
            "season": "2023",
            "round": "1",
            "raceName": "Bahrain Grand Prix",
            "date": "2023-03-05",
            "time": "15:00:00Z",
            "Results": [
              {
                "number": "1", "position": "1", "points": "25",
                "Driver": {"driverId": "max_verstappen", "code": "VER", "givenName": "Max", "familyName": "Verstappen"},
                "Constructor": {"constructorId": "red_bull", "name": "Red Bull"},
                "status": "Finished"
              },
              {
                "number": "16", "position": "20", "points": "0",
                "Driver": {"driverId": "leclerc", "code": "LEC", "givenName": "Charles", "familyName": "Leclerc"},
                "Constructor": {"constructorId": "ferrari", "name": "Ferrari"},
                "status": "Engine"
              }
            ]
          }]
        }
      }
    }"#;

    const CALENDAR: &str = r#"{
      "MRData": {
        "RaceTable": {
          "season": "2023",
          "Races": [
            {"round": "1", "raceName": "Bahrain Grand Prix", "date": "2023-03-05", "time": "15:00:00Z"},
            {"round": "4", "raceName": "Azerbaijan Grand Prix", "date": "2023-04-30", "time": "11:00:00Z",
             "Sprint": {"date": "2023-04-29", "time": "13:30:00Z"}}
          ]
        }
      }
    }"#;

    const STANDINGS: &str = r#"{
      "MRData": {
        "StandingsTable": {
          "season": "2023",
          "StandingsLists": [{
            "season": "2023",
            "round": "22",
            "DriverStandings": [
              {"position": "1", "positionText": "1", "points": "575", "wins": "19",
               "Driver": {"code": "VER", "givenName": "Max", "familyName": "Verstappen"},
               "Constructors": [{"name": "Red Bull"}]},
              {"positionText": "-", "points": "0", "wins": "0",
               "Driver": {"givenName": "Michael", "familyName": "Schumacher"},
               "Constructors": []}
            ]
          }]
        }
      }
    }"#;

    const EMPTY: &str = r#"{"MRData": {"RaceTable": {"Races": []}}}"#;

    #[test]
    fn test_parse_race_result() {
        let result = parse_race_result(RESULTS).unwrap().unwrap();
        assert_eq!(result.race_name, "Bahrain Grand Prix");
        assert_eq!(result.classifications.len(), 2);

        let winner = &result.classifications[0];
        assert_eq!(winner.position, "1");
        assert_eq!(winner.driver_code.as_deref(), Some("VER"));
        assert_eq!(winner.driver_name(), "Max Verstappen");
        assert_eq!(winner.team, "Red Bull");
        assert_eq!(winner.points, "25");
        assert_eq!(result.classifications[1].status, "Engine");
    }

    #[test]
    fn test_parse_calendar_flags_sprints() {
        let races = parse_calendar(CALENDAR).unwrap().unwrap();
        assert_eq!(races.len(), 2);
        assert!(!races[0].has_sprint);
        assert!(races[1].has_sprint);
        assert_eq!(races[1].round, 4);
        assert_eq!(races[1].time.as_deref(), Some("11:00:00Z"));
    }

    #[test]
    fn test_parse_standings() {
        let standings = parse_standings(STANDINGS).unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].team, "Red Bull");
        assert_eq!(standings[0].points, "575");
        assert_eq!(standings[1].position, "-");
        assert_eq!(standings[1].team, "");
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(parse_race_result(EMPTY).unwrap(), None);
        assert_eq!(parse_calendar(EMPTY).unwrap(), None);
        assert!(parse_standings(EMPTY).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_an_api_error() {
        assert!(matches!(
            parse_race_result("<html>"),
            Err(F1Error::Api(_))
        ));
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 7 "));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }

    /// Answers every connection with `route(path)`, a full raw HTTP response.
    async fn serve(route: fn(&str) -> String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let _ = socket.write_all(route(&path).as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn http(status: &str, headers: &str, body: &str) -> String {
        format!(
            concat!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n",
                "Content-Length: {}\r\nConnection: close\r\n{}\r\n{}"
            ),
            status,
            body.len(),
            headers,
            body
        )
    }

    #[tokio::test]
    async fn test_rate_limit_is_an_error_with_retry_after() {
        let base = serve(|_| http("429 Too Many Requests", "Retry-After: 3\r\n", "")).await;
        let client = JolpicaClient::with_base_url(base).unwrap();

        let err = client.race_result(2023, 1).await.unwrap_err();
        assert!(matches!(
            err,
            F1Error::RateLimited { retry_after: Some(wait) } if wait == Duration::from_secs(3)
        ));
    }

    #[tokio::test]
    async fn test_not_found_means_no_data() {
        let base = serve(|_| http("404 Not Found", "", "")).await;
        let client = JolpicaClient::with_base_url(base).unwrap();
        assert_eq!(client.race_result(2023, 30).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_error_is_an_api_error() {
        let base = serve(|_| http("503 Service Unavailable", "", "")).await;
        let client = JolpicaClient::with_base_url(base).unwrap();
        assert!(matches!(
            client.season_calendar(2023).await,
            Err(F1Error::Api(_))
        ));
    }

    #[tokio::test]
    async fn test_driver_season_fails_when_results_stay_rate_limited() {
        let base = serve(|path| {
            if path.contains("results") {
                http("429 Too Many Requests", "Retry-After: 0\r\n", "")
            } else {
                http("200 OK", "", CALENDAR)
            }
        })
        .await;
        let service = F1Service::new(JolpicaClient::with_base_url(base).unwrap());

        let err = service.driver_season("VER", 2023, true).await.unwrap_err();
        assert!(matches!(err, F1Error::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_requests_are_paced() {
        let base = serve(|_| http("404 Not Found", "", "")).await;
        let client = JolpicaClient::with_base_url(base).unwrap();

        let started = Instant::now();
        for round in 1..=3 {
            client.race_result(2023, round).await.unwrap();
        }
        assert!(started.elapsed() >= MIN_REQUEST_GAP * 2);
    }
}
