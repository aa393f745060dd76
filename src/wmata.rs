extern crate reqwest;
extern crate serde;
extern crate serde_json;

use crate::clock::Clock;
use crate::prediction::{self, Prediction, Predictions, RawArrival};
use crate::result;

pub const DEFAULT_BASE_URL: &str = "http://api.wmata.com/StationPrediction.svc/json/GetPrediction";

/// Fetches a URL and returns the body of a 2xx response.
///
/// A non-2xx response must come back as `MetroDashError::HttpStatus` and an
/// unreadable body as `MetroDashError::HttpBody`; any other error is taken
/// to mean no response arrived at all.
pub type FetchFn = Box<dyn Fn(&str) -> result::MetroDashResult<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Trains(usize),
    /// The payload was fine, it just had nothing worth showing.
    NoTrains,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct WmataPredictionResponse {
    trains: Vec<WmataTrain>,
}

// Fields are loosely typed so one odd record can't sink the whole payload.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct WmataTrain {
    destination: Option<serde_json::Value>,
    min: Option<serde_json::Value>,
    line: Option<serde_json::Value>,
    group: Option<serde_json::Value>,
}

fn text_field(value: &Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => return s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => return n.to_string(),
        _ => return String::new(),
    }
}

pub fn parse_arrivals(response_body: &str) -> result::MetroDashResult<Vec<RawArrival>> {
    let response: WmataPredictionResponse = serde_json::from_str(response_body)?;

    return Ok(response.trains.iter().map(|train| RawArrival {
        destination: text_field(&train.destination),
        minutes: text_field(&train.min),
        line: text_field(&train.line),
        group: text_field(&train.group),
    }).collect());
}

pub fn http_fetch_fn(timeout: std::time::Duration) -> result::MetroDashResult<FetchFn> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent("metrodash")
        .build()?;

    return Ok(Box::new(move |url: &str| fetch_with_client(&client, url)));
}

fn fetch_with_client(client: &reqwest::blocking::Client, url: &str) -> result::MetroDashResult<String> {
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(result::MetroDashError::HttpStatus(status.as_u16()));
    }

    return response.text().map_err(result::MetroDashError::HttpBody);
}

/// Latest selected predictions for one station.
pub struct ArrivalSource {
    station_code: String,
    api_key: String,
    base_url: String,
    fetch_fn: FetchFn,

    trains: Predictions,
    last_fetch_ms: Option<u64>,
    last_fetch_ok: bool,
}

impl ArrivalSource {
    pub fn new(station_code: &str, api_key: &str, base_url: &str, fetch_fn: FetchFn) -> ArrivalSource {
        return ArrivalSource {
            station_code: station_code.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_fn: fetch_fn,
            trains: Predictions::new(),
            last_fetch_ms: None,
            last_fetch_ok: false,
        };
    }

    fn url(&self) -> String {
        return format!("{}/{}?contentType=application/json&api_key={}",
                       self.base_url, self.station_code, self.api_key);
    }

    fn redacted_url(&self) -> String {
        return format!("{}/{}?contentType=application/json&api_key=<redacted>",
                       self.base_url, self.station_code);
    }

    /// Fetches and re-selects predictions.
    ///
    /// On error the previous predictions stay in place. `last_fetch_ms`
    /// moves whenever the server answered, even with an error status or a
    /// body we couldn't parse.
    pub fn fetch(&mut self, clock: &dyn Clock) -> result::MetroDashResult<FetchOutcome> {
        debug!("Fetching {}", self.redacted_url());

        let response = (self.fetch_fn)(&self.url());

        let answered = match response {
            Ok(_) => true,
            Err(ref err) => err.server_answered(),
        };
        if answered {
            self.last_fetch_ms = Some(clock.now_ms());
        }

        let arrivals = match response.and_then(|body| parse_arrivals(&body)) {
            Ok(arrivals) => arrivals,
            Err(err) => {
                warn!("Fetch for station {} failed: {}", self.station_code, err);
                self.last_fetch_ok = false;
                return Err(err);
            }
        };

        let trains = prediction::select_predictions(&arrivals);
        info!("Parsed {} arrivals, selected {} trains", arrivals.len(), trains.len());

        self.trains = trains;
        self.last_fetch_ok = true;

        if self.trains.is_empty() {
            return Ok(FetchOutcome::NoTrains);
        }
        return Ok(FetchOutcome::Trains(self.trains.len()));
    }

    pub fn train_count(&self) -> usize {
        return self.trains.len();
    }

    pub fn train_at(&self, index: usize) -> Prediction {
        return self.trains.get(index).cloned().unwrap_or_else(Prediction::absent);
    }

    pub fn trains(&self) -> &Predictions {
        return &self.trains;
    }

    pub fn last_fetch_ms(&self) -> Option<u64> {
        return self.last_fetch_ms;
    }

    pub fn last_fetch_ok(&self) -> bool {
        return self.last_fetch_ok;
    }

    pub fn station_code(&self) -> &str {
        return &self.station_code;
    }
}
