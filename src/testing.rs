//! In-memory `ShowSource` for exercising the views without a network.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{SetlistItem, ShowSummary};
use crate::phishnet::{GatewayError, ShowSource};

pub enum Canned<T> {
    Ok(T),
    Config,
    Transport,
    Decode,
}

impl<T: Clone> Canned<T> {
    fn produce(&self) -> Result<T, GatewayError> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::Config => Err(GatewayError::Config("no api key".into())),
            Canned::Transport => Err(GatewayError::Transport("connection reset".into())),
            Canned::Decode => Err(GatewayError::Decode("expected object".into())),
        }
    }
}

pub struct StaticSource {
    shows: Canned<Vec<ShowSummary>>,
    setlist: Canned<Vec<SetlistItem>>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new(shows: Canned<Vec<ShowSummary>>, setlist: Canned<Vec<SetlistItem>>) -> Self {
        Self {
            shows,
            setlist,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_shows(shows: Vec<ShowSummary>) -> Self {
        Self::new(Canned::Ok(shows), Canned::Ok(Vec::new()))
    }

    pub fn with_setlist(items: Vec<SetlistItem>) -> Self {
        Self::new(Canned::Ok(Vec::new()), Canned::Ok(items))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    fn record(&self, request: String) {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);
    }
}

#[async_trait]
impl ShowSource for StaticSource {
    async fn fetch_shows_for_year(&self, year: &str) -> Result<Vec<ShowSummary>, GatewayError> {
        self.record(format!("showyear/{year}"));
        self.shows.produce()
    }

    async fn fetch_setlist_for_date(&self, date: &str) -> Result<Vec<SetlistItem>, GatewayError> {
        self.record(format!("showdate/{date}"));
        self.setlist.produce()
    }
}

pub fn show(id: i64, date: &str, artist: &str) -> ShowSummary {
    ShowSummary {
        id,
        date: date.to_string(),
        venue: Some("Saratoga Performing Arts Center".to_string()),
        city: Some("Saratoga Springs".to_string()),
        state: Some("NY".to_string()),
        country: Some("USA".to_string()),
        artist_name: artist.to_string(),
    }
}

pub fn song(set: &str, name: &str, mark: Option<&str>) -> SetlistItem {
    SetlistItem {
        set_label: set.to_string(),
        song: name.to_string(),
        transition_mark: mark.map(str::to_string),
        venue: "Saratoga Performing Arts Center".to_string(),
        city: "Saratoga Springs".to_string(),
        show_date: "2025-06-28".to_string(),
    }
}
