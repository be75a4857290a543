pub mod calendar;
pub mod config;
pub mod models;
pub mod phishnet;
pub mod setlist;
mod utils;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::{Datelike, Local, NaiveDate};

use calendar::DayLister;
use config::AppConfig;
use models::CalendarDay;
use phishnet::{GatewayError, PhishNetClient, ShowSource};
use setlist::{SetSection, SetlistAssembler};

/// Everything a setlist view needs for one date.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShowSetlist {
    pub date: String,
    pub header: Option<String>,
    pub lines: Vec<String>,
    pub sets: Vec<SetSection>,
}

pub fn gateway(config: &AppConfig) -> Result<Arc<dyn ShowSource>, GatewayError> {
    Ok(Arc::new(PhishNetClient::from_config(config)?))
}

pub async fn list_days(
    source: Arc<dyn ShowSource>,
    config: &AppConfig,
    year: &str,
    month: &str,
) -> Result<Vec<CalendarDay>, GatewayError> {
    DayLister::new(source, config.artist())
        .list_days(year, month)
        .await
}

pub async fn show_setlist(
    source: Arc<dyn ShowSource>,
    date: &str,
) -> Result<ShowSetlist, GatewayError> {
    let items = SetlistAssembler::new(source).fetch_items(date).await?;
    Ok(ShowSetlist {
        date: date.to_string(),
        header: setlist::show_header(&items),
        lines: items.iter().map(models::SetlistItem::display_line).collect(),
        sets: setlist::group_sets(&items),
    })
}

/// Four digit year and two digit month, defaulting to the current local month.
pub fn normalize_year_month(
    year: Option<&str>,
    month: Option<&str>,
) -> anyhow::Result<(String, String)> {
    let today = Local::now().date_naive();
    let year = match year {
        Some(text) => text
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|value| (1000..=9999).contains(value))
            .ok_or_else(|| anyhow!("year must be four digits, got {text:?}"))?,
        None => today.year(),
    };
    let month = match month {
        Some(text) => text
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|value| (1..=12).contains(value))
            .ok_or_else(|| anyhow!("month must be 1-12, got {text:?}"))?,
        None => today.month(),
    };
    Ok((format!("{year:04}"), format!("{month:02}")))
}

/// Accepts "2025-6-8" style input and renders it zero padded.
pub fn normalize_date(text: &str) -> anyhow::Result<String> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .with_context(|| format!("date must look like YYYY-MM-DD, got {text:?}"))?;
    Ok(date.format("%Y-%m-%d").to_string())
}
