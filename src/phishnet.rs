use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::{self, SetlistEnvelope, SetlistItem, ShowListEnvelope, ShowSummary};
use crate::utils;

const ERROR_BODY_LIMIT: usize = 200;

const USER_AGENT: &str = "phish-setlists/0.1 (+https://github.com/mike/phish-setlists)";

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing API key, bad base URL, or a request path that cannot be built.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

/// Where shows and setlists come from. The calendar and setlist views only see this trait,
/// so tests can hand them canned data.
#[async_trait]
pub trait ShowSource: Send + Sync {
    async fn fetch_shows_for_year(&self, year: &str) -> Result<Vec<ShowSummary>, GatewayError>;
    async fn fetch_setlist_for_date(&self, date: &str) -> Result<Vec<SetlistItem>, GatewayError>;
}

/// phish.net reports some failures inside a 200 response.
pub trait Envelope {
    fn api_error(&self) -> Option<String>;
}

impl Envelope for ShowListEnvelope {
    fn api_error(&self) -> Option<String> {
        in_band_error(self.error, &self.error_message)
    }
}

impl Envelope for SetlistEnvelope {
    fn api_error(&self) -> Option<String> {
        in_band_error(self.error, &self.error_message)
    }
}

fn in_band_error(flag: bool, message: &Option<String>) -> Option<String> {
    if !flag {
        return None;
    }
    Some(
        message
            .clone()
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| "api reported an error".to_string()),
    )
}

pub struct PhishNetClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PhishNetClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, GatewayError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GatewayError::Config("phish.net api key is not configured".into()));
        }

        let base_url = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(base_url)
            .map_err(|err| GatewayError::Config(format!("invalid base url {base_url:?}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::Config(format!(
                "unsupported base url scheme: {}",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| GatewayError::Config(format!("http client: {err}")))?;

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Config("phish.net api key is not configured".into()))?;
        let client = Self::new(config.base_url(), api_key)?;
        info!("phish.net gateway targeting {}", client.base_url);
        Ok(client)
    }

    fn endpoint_url(&self, method: &str, value: &str) -> Result<Url, GatewayError> {
        let raw = format!("{}/setlists/{}/{}.json", self.base_url, method, value);
        Url::parse_with_params(&raw, [("apikey", self.api_key.as_str())])
            .map_err(|err| GatewayError::Config(format!("malformed request url: {err}")))
    }

    async fn fetch_body(&self, url: Url) -> Result<String, GatewayError> {
        debug!("GET {}", utils::redact_api_key(url.as_str()));
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(without_key(err)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| GatewayError::Transport(without_key(err)))?;

        if !status.is_success() {
            return Err(GatewayError::Transport(format!(
                "status {}: {}",
                status,
                body_excerpt(&text)
            )));
        }
        debug!("response status {status}, {} bytes", text.len());
        Ok(text)
    }

    /// Request, decode and unwrap one envelope. Both endpoints go through here.
    async fn fetch_envelope<E>(&self, method: &str, value: &str) -> Result<E, GatewayError>
    where
        E: DeserializeOwned + Envelope,
    {
        let url = self.endpoint_url(method, value)?;
        let body = self.fetch_body(url).await?;
        decode_envelope(&body)
    }
}

#[async_trait]
impl ShowSource for PhishNetClient {
    async fn fetch_shows_for_year(&self, year: &str) -> Result<Vec<ShowSummary>, GatewayError> {
        if !YEAR_RE.is_match(year) {
            return Err(GatewayError::Config(format!(
                "malformed request url: year must be four digits, got {year:?}"
            )));
        }
        let envelope: ShowListEnvelope = self.fetch_envelope("showyear", year).await?;
        Ok(shows_from_envelope(envelope))
    }

    async fn fetch_setlist_for_date(&self, date: &str) -> Result<Vec<SetlistItem>, GatewayError> {
        if !models::is_show_date(date) {
            return Err(GatewayError::Config(format!(
                "malformed request url: date must be YYYY-MM-DD, got {date:?}"
            )));
        }
        let envelope: SetlistEnvelope = self.fetch_envelope("showdate", date).await?;
        debug!("setlist for {date}: {} songs", envelope.data.len());
        Ok(envelope.data)
    }
}

pub fn decode_envelope<E>(body: &str) -> Result<E, GatewayError>
where
    E: DeserializeOwned + Envelope,
{
    let value: Value =
        serde_json::from_str(body).map_err(|err| GatewayError::Decode(err.to_string()))?;
    if !value.is_object() {
        return Err(GatewayError::Decode("response is not a json object".into()));
    }
    let envelope: E =
        serde_json::from_value(value).map_err(|err| GatewayError::Decode(err.to_string()))?;
    if let Some(message) = envelope.api_error() {
        return Err(GatewayError::Transport(format!("phish.net: {message}")));
    }
    Ok(envelope)
}

/// Missing or non-array `data` is an empty year. Records that fail to decode are skipped.
pub fn shows_from_envelope(envelope: ShowListEnvelope) -> Vec<ShowSummary> {
    let records = match envelope.data {
        Some(Value::Array(records)) => records,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            warn!("show list data is not an array: {}", other);
            return Vec::new();
        }
    };

    let total = records.len();
    let mut shows = Vec::with_capacity(total);
    for record in records {
        match serde_json::from_value::<ShowSummary>(record) {
            Ok(show) if show.has_valid_date() => shows.push(show),
            Ok(show) => warn!("skipping show {} with malformed date {:?}", show.id, show.date),
            Err(err) => warn!("skipping undecodable show record: {err}"),
        }
    }
    debug!("decoded {} of {} show records", shows.len(), total);
    shows
}

/// First `ERROR_BODY_LIMIT` characters of a response body, for error messages.
fn body_excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

fn without_key(err: reqwest::Error) -> String {
    utils::redact_api_key(&err.without_url().to_string())
}
