use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::models::SetlistItem;
use crate::phishnet::{GatewayError, ShowSource};

pub struct SetlistAssembler {
    source: Arc<dyn ShowSource>,
}

impl SetlistAssembler {
    pub fn new(source: Arc<dyn ShowSource>) -> Self {
        Self { source }
    }

    /// Display lines in performance order. `date` must already be zero padded.
    pub async fn build_setlist(&self, date: &str) -> Result<Vec<String>, GatewayError> {
        let items = self.source.fetch_setlist_for_date(date).await?;
        debug!("{} songs for {date}", items.len());
        Ok(items.iter().map(SetlistItem::display_line).collect())
    }

    /// The raw items, for callers that also want the header or set sections.
    pub async fn fetch_items(&self, date: &str) -> Result<Vec<SetlistItem>, GatewayError> {
        self.source.fetch_setlist_for_date(date).await
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SetSection {
    pub title: String,
    pub lines: Vec<String>,
}

pub fn set_title(label: &str) -> String {
    let label = label.trim();
    match label.to_ascii_lowercase().as_str() {
        "e" => "Encore".to_string(),
        encore if encore.starts_with('e') && encore[1..].chars().all(|c| c.is_ascii_digit()) => {
            format!("Encore {}", &encore[1..])
        }
        _ => format!("Set {label}"),
    }
}

/// Groups consecutive songs sharing a set label. Order is never changed.
pub fn group_sets(items: &[SetlistItem]) -> Vec<SetSection> {
    let mut sections: Vec<(String, SetSection)> = Vec::new();
    for item in items {
        let line = item.display_line();
        match sections.last_mut() {
            Some((label, section)) if *label == item.set_label => {
                section.lines.push(line);
                continue;
            }
            _ => {}
        }
        sections.push((
            item.set_label.clone(),
            SetSection {
                title: set_title(&item.set_label),
                lines: vec![line],
            },
        ));
    }
    sections.into_iter().map(|(_, section)| section).collect()
}

/// "<date> - <venue>, <city>" taken from the first song.
pub fn show_header(items: &[SetlistItem]) -> Option<String> {
    let first = items.first()?;
    let place = [first.venue.trim(), first.city.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    match (first.show_date.trim(), place.is_empty()) {
        ("", true) => None,
        ("", false) => Some(place),
        (date, true) => Some(date.to_string()),
        (date, false) => Some(format!("{date} - {place}")),
    }
}
