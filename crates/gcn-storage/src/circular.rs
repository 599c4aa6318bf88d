//! Circular storage provider trait and search criteria.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use gcn_model::{Circular, CircularSubmission};

use crate::error::StorageResult;

/// Default page size when the caller supplies none.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Resolves a named relative date preset to absolute inclusive bounds,
/// evaluated against `now`.
///
/// Recognized presets: `hour`, `today`, `day`, `week`, `month`, `year`,
/// `mtd` (month to date), `ytd` (year to date). An unrecognized preset
/// degrades to an unbounded range rather than an error.
#[must_use]
pub fn resolve_fuzzy_time(
    preset: &str,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let today = now.date_naive();
    let start = match preset {
        "hour" => now - Duration::hours(1),
        "today" => today.and_time(NaiveTime::MIN).and_utc(),
        "day" => now - Duration::days(1),
        "week" => now - Duration::days(7),
        "month" => now.checked_sub_months(Months::new(1)).unwrap_or(now),
        "year" => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        "mtd" => today
            .with_day(1)
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
            .and_utc(),
        "ytd" => today
            .with_day(1)
            .and_then(|d| d.with_month(1))
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
            .and_utc(),
        _ => return (None, None),
    };
    (Some(start), Some(now))
}

/// Search criteria for circulars.
#[derive(Debug, Default, Clone)]
pub struct CircularSearchCriteria {
    /// Free-text query matched across submitter, subject, and body.
    pub query: Option<String>,
    /// Inclusive lower time bound; `None` is open.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper time bound; `None` is open.
    pub end: Option<DateTime<Utc>>,
    /// Zero-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

impl CircularSearchCriteria {
    /// Creates criteria with the default page size and no filters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: None,
            start: None,
            end: None,
            page: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets both time bounds from a fuzzy preset evaluated at `now`.
    #[must_use]
    pub fn fuzzy_time(mut self, preset: &str, now: DateTime<Utc>) -> Self {
        (self.start, self.end) = resolve_fuzzy_time(preset, now);
        self
    }

    /// Sets the inclusive time bounds; `None` leaves a bound open.
    #[must_use]
    pub const fn between(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Sets the zero-based page number.
    #[must_use]
    pub const fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the row offset for this page.
    ///
    /// Saturates at `u64::MAX`; page and limit are caller-controlled and
    /// an oversized product must not wrap.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }
}

/// One page of search results, sorted by circular id descending.
#[derive(Debug, Clone)]
pub struct CircularPage {
    /// Matching circulars for the requested page.
    pub items: Vec<Circular>,
    /// Total matches across all pages.
    pub total_items: u64,
    /// Zero-based page number that was requested.
    pub page: u64,
    /// Page size that was requested.
    pub limit: u64,
}

impl CircularPage {
    /// Number of pages needed to cover every match.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total_items.div_ceil(self.limit)
        }
    }
}

/// Provider for the circulars store.
///
/// Identifier assignment is delegated to the backend's atomic increment
/// primitive; implementations must guarantee unique, monotonically
/// increasing ids even under concurrent inserts.
#[async_trait]
pub trait CircularProvider: Send + Sync {
    /// Persists a submission, assigning the next identifier and the
    /// creation timestamp. Returns the stored circular.
    async fn put(&self, submission: CircularSubmission) -> StorageResult<Circular>;

    /// Gets a circular by id.
    async fn get(&self, circular_id: u64) -> StorageResult<Option<Circular>>;

    /// Searches circulars, sorted by id descending.
    async fn search(&self, criteria: &CircularSearchCriteria) -> StorageResult<CircularPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_preset_resolves_to_seven_days() {
        let now = Utc::now();
        let (start, end) = resolve_fuzzy_time("week", now);
        assert_eq!(start, Some(now - Duration::days(7)));
        assert_eq!(end, Some(now));
    }

    #[test]
    fn unrecognized_preset_is_unbounded() {
        let (start, end) = resolve_fuzzy_time("fortnight", Utc::now());
        assert_eq!(start, None);
        assert_eq!(end, None);
    }

    #[test]
    fn hour_and_day_presets() {
        let now = Utc::now();
        assert_eq!(
            resolve_fuzzy_time("hour", now).0,
            Some(now - Duration::hours(1))
        );
        assert_eq!(
            resolve_fuzzy_time("day", now).0,
            Some(now - Duration::days(1))
        );
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        let now = Utc::now();
        let (start, _) = resolve_fuzzy_time("mtd", now);
        let start = start.unwrap();
        assert_eq!(start.day(), 1);
        assert_eq!(start.month(), now.month());
    }

    #[test]
    fn offset_is_page_times_limit() {
        let criteria = CircularSearchCriteria::new().page(2).limit(10);
        assert_eq!(criteria.offset(), 20);
    }

    #[test]
    fn offset_saturates_on_oversized_pages() {
        let criteria = CircularSearchCriteria::new().page(u64::MAX / 2 + 1).limit(2);
        assert_eq!(criteria.offset(), u64::MAX);

        let exact = CircularSearchCriteria::new().page(u64::MAX).limit(1);
        assert_eq!(exact.offset(), u64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = CircularPage {
            items: Vec::new(),
            total_items: 41,
            page: 0,
            limit: 10,
        };
        assert_eq!(page.total_pages(), 5);

        let exact = CircularPage {
            items: Vec::new(),
            total_items: 40,
            page: 0,
            limit: 10,
        };
        assert_eq!(exact.total_pages(), 4);
    }
}
