use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::models::CalendarDay;
use crate::phishnet::{GatewayError, ShowSource};

/// Answers "which days in this month had a show" for one artist.
pub struct DayLister {
    source: Arc<dyn ShowSource>,
    artist: String,
}

impl DayLister {
    pub fn new(source: Arc<dyn ShowSource>, artist: impl Into<String>) -> Self {
        Self {
            source,
            artist: artist.into(),
        }
    }

    /// `year` is four digits and `month` is zero padded ("06"). An empty list means no shows.
    pub async fn list_days(
        &self,
        year: &str,
        month: &str,
    ) -> Result<Vec<CalendarDay>, GatewayError> {
        let shows = self.source.fetch_shows_for_year(year).await?;

        // Keyed on the parsed day so "5" and "05" collapse into one entry.
        let days: BTreeSet<CalendarDay> = shows
            .iter()
            .filter(|show| show.is_by(&self.artist))
            .filter_map(|show| show.date_parts())
            .filter(|(y, m, _)| *y == year && *m == month)
            .filter_map(|(_, _, day)| day.parse::<u32>().ok())
            .filter_map(CalendarDay::new)
            .collect();
        let sorted: Vec<CalendarDay> = days.into_iter().collect();

        debug!(
            "{} of {} shows in {year}-{month} by {}: {} days",
            shows.iter().filter(|show| show.is_by(&self.artist)).count(),
            shows.len(),
            self.artist,
            sorted.len()
        );
        Ok(sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{show, Canned, StaticSource};

    fn rendered(days: &[CalendarDay]) -> Vec<String> {
        days.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn filters_by_artist_and_dedupes() {
        let source = Arc::new(StaticSource::with_shows(vec![
            show(1, "2025-06-28", "Phish"),
            show(2, "2025-06-28", "Goose"),
            show(3, "2025-06-20", "phish"),
        ]));
        let lister = DayLister::new(source.clone(), "Phish");

        let days = lister.list_days("2025", "06").await.expect("list days");
        assert_eq!(rendered(&days), vec!["20", "28"]);
        assert_eq!(source.requests(), vec!["showyear/2025".to_string()]);
    }

    #[tokio::test]
    async fn other_artist_alone_does_not_count() {
        let source = Arc::new(StaticSource::with_shows(vec![
            show(1, "2025-07-04", "Goose"),
            show(2, "2025-07-05", "PHISH"),
        ]));
        let days = DayLister::new(source, "Phish")
            .list_days("2025", "07")
            .await
            .expect("list days");
        assert_eq!(rendered(&days), vec!["05"]);
    }

    #[tokio::test]
    async fn duplicate_shows_on_one_day_count_once() {
        let source = Arc::new(StaticSource::with_shows(vec![
            show(1, "2025-12-31", "Phish"),
            show(2, "2025-12-31", "Phish"),
            show(3, "2025-12-02", "Phish"),
            show(4, "2025-12-30", "Phish"),
        ]));
        let days = DayLister::new(source, "Phish")
            .list_days("2025", "12")
            .await
            .expect("list days");
        assert_eq!(rendered(&days), vec!["02", "30", "31"]);
    }

    #[tokio::test]
    async fn differently_spelled_days_count_once() {
        let source = Arc::new(StaticSource::with_shows(vec![
            show(1, "2025-06-05", "Phish"),
            show(2, "2025-06-5", "Phish"),
            show(3, "2025-06-+5", "Phish"),
            show(4, "2025-06-3", "Phish"),
        ]));
        let days = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect("list days");
        assert_eq!(rendered(&days), vec!["03", "05"]);
    }

    #[tokio::test]
    async fn malformed_dates_are_skipped() {
        let source = Arc::new(StaticSource::with_shows(vec![
            show(1, "2025-06", "Phish"),
            show(2, "2025-06-14-late", "Phish"),
            show(3, "2025-06-xx", "Phish"),
            show(4, "2025-06-00", "Phish"),
            show(5, "2025-06-13", "Phish"),
        ]));
        let days = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect("list days");
        assert_eq!(rendered(&days), vec!["13"]);
    }

    #[tokio::test]
    async fn ignores_other_months_and_years() {
        let source = Arc::new(StaticSource::with_shows(vec![
            show(1, "2025-05-30", "Phish"),
            show(2, "2024-06-21", "Phish"),
            show(3, "2025-06-01", "Phish"),
        ]));
        let days = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect("list days");
        assert_eq!(rendered(&days), vec!["01"]);
    }

    #[tokio::test]
    async fn empty_year_is_empty_result() {
        let source = Arc::new(StaticSource::with_shows(Vec::new()));
        let days = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect("list days");
        assert!(days.is_empty());
    }

    #[tokio::test]
    async fn gateway_errors_propagate_unchanged() {
        let source = Arc::new(StaticSource::new(Canned::Transport, Canned::Ok(Vec::new())));
        let err = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect_err("transport error");
        assert!(matches!(err, GatewayError::Transport(_)));

        let source = Arc::new(StaticSource::new(Canned::Config, Canned::Ok(Vec::new())));
        let err = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect_err("config error");
        assert!(matches!(err, GatewayError::Config(_)));

        let source = Arc::new(StaticSource::new(Canned::Decode, Canned::Ok(Vec::new())));
        let err = DayLister::new(source, "Phish")
            .list_days("2025", "06")
            .await
            .expect_err("decode error");
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn results_are_sorted_unique_and_in_range() {
        let dates = ["2025-08-09", "2025-08-01", "2025-08-31", "2025-08-09", "2025-08-15"];
        let shows = dates
            .iter()
            .enumerate()
            .map(|(idx, date)| show(idx as i64, date, "Phish"))
            .collect();
        let days = DayLister::new(Arc::new(StaticSource::with_shows(shows)), "Phish")
            .list_days("2025", "08")
            .await
            .expect("list days");

        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(days.iter().all(|day| (1..=31).contains(&day.day())));
        assert!(rendered(&days).iter().all(|day| day.len() == 2));
        assert_eq!(rendered(&days), vec!["01", "09", "15", "31"]);
    }
}
