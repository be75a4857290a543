use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

static SHOW_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid show date regex"));

/// One concert as listed by the "shows by year" endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShowSummary {
    #[serde(rename = "showid")]
    pub id: i64,
    #[serde(rename = "showdate")]
    pub date: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub artist_name: String,
}

impl ShowSummary {
    pub fn has_valid_date(&self) -> bool {
        is_show_date(&self.date)
    }

    /// Splits the date into (year, month, day). `None` unless there are exactly three parts.
    pub fn date_parts(&self) -> Option<(&str, &str, &str)> {
        let mut parts = self.date.split('-');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(year), Some(month), Some(day), None) => Some((year, month, day)),
            _ => None,
        }
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn is_by(&self, artist: &str) -> bool {
        self.artist_name.eq_ignore_ascii_case(artist)
    }
}

/// One performed song. Position in the returned list is the performance order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SetlistItem {
    #[serde(rename = "set")]
    pub set_label: String,
    pub song: String,
    #[serde(rename = "trans_mark", default)]
    pub transition_mark: Option<String>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "showdate", default)]
    pub show_date: String,
}

impl SetlistItem {
    /// The transition mark with surrounding whitespace removed, if anything is left.
    pub fn mark(&self) -> Option<&str> {
        self.transition_mark
            .as_deref()
            .map(str::trim)
            .filter(|mark| !mark.is_empty())
    }

    pub fn display_line(&self) -> String {
        match self.mark() {
            Some(mark) => format!("{} {}", self.song, mark),
            None => self.song.clone(),
        }
    }
}

/// Year endpoint envelope. Records stay raw so one bad show cannot sink the whole year.
#[derive(Deserialize, Debug, Default)]
pub struct ShowListEnvelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
pub struct SetlistEnvelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    pub data: Vec<SetlistItem>,
}

/// Day of month rendered as two digits ("01".."31").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(u8);

impl CalendarDay {
    pub fn new(day: u32) -> Option<Self> {
        if (1..=31).contains(&day) {
            Some(Self(day as u8))
        } else {
            None
        }
    }

    pub fn day(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn is_show_date(text: &str) -> bool {
    SHOW_DATE_RE.is_match(text)
}
