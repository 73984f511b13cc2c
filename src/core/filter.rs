// LeadDesk - core/filter.rs
//
// Composable filter engine for request lists.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O or store dependencies.

use crate::core::model::{Request, RequestStatus};
use crate::util::constants::WEEK_WINDOW_DAYS;
use chrono::{Days, Months, NaiveDate};

/// Status predicate: either every status or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No status filtering.
    #[default]
    All,
    /// Only requests with exactly this status.
    Only(RequestStatus),
}

/// Relative date window over a request's creation day.
///
/// All comparisons operate on the local calendar day of `created_at`
/// (time of day discarded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    /// No date filtering.
    #[default]
    All,

    /// Created on the current calendar day.
    Today,

    /// Created within the trailing 7 calendar days, inclusive of today
    /// (lower bound `today - 6`).
    Week,

    /// Created on or after today's date minus one calendar month.
    ///
    /// Calendar-month subtraction, not a fixed 30-day window. When the
    /// current day-of-month has no counterpart in the prior month the
    /// bound clamps to that month's last day (chrono `checked_sub_months`
    /// policy): 31 March - 1 month = 28/29 February.
    Month,
}

impl DateWindow {
    /// Whether a creation day falls inside this window relative to `today`.
    pub fn contains(&self, day: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateWindow::All => true,
            DateWindow::Today => day == today,
            DateWindow::Week => {
                let lower = today
                    .checked_sub_days(Days::new(WEEK_WINDOW_DAYS as u64 - 1))
                    .unwrap_or(NaiveDate::MIN);
                day >= lower
            }
            DateWindow::Month => {
                let lower = today
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(NaiveDate::MIN);
                day >= lower
            }
        }
    }
}

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Substring text search (case-insensitive) against full name, phone,
    /// and comment. Empty or whitespace-only = no text filter.
    pub text_query: String,

    /// Status predicate.
    pub status: StatusFilter,

    /// Relative date window predicate.
    pub date_window: DateWindow,
}

impl RequestFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.text_query.trim().is_empty()
            && self.status == StatusFilter::All
            && self.date_window == DateWindow::All
    }
}

/// Apply filters to a slice of requests, returning indices of matching
/// requests relative to `today`.
///
/// Returns a Vec of indices into the original slice, in input order: the
/// result is always a stable subsequence of the input (no re-sort, no
/// duplication). Passing an empty filter returns every index unchanged.
pub fn apply_filters(requests: &[Request], filter: &RequestFilter, today: NaiveDate) -> Vec<usize> {
    if filter.is_empty() {
        return (0..requests.len()).collect();
    }

    let text_lower = filter.text_query.trim().to_lowercase();

    requests
        .iter()
        .enumerate()
        .filter(|(_, request)| matches_all(request, filter, &text_lower, today))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single request matches all active filters.
fn matches_all(
    request: &Request,
    filter: &RequestFilter,
    text_lower: &str,
    today: NaiveDate,
) -> bool {
    // Status filter
    if let StatusFilter::Only(status) = filter.status {
        if request.status != status {
            return false;
        }
    }

    // Date window filter
    if filter.date_window != DateWindow::All {
        let day = request.created_at.date_naive();
        if !filter.date_window.contains(day, today) {
            return false;
        }
    }

    // Text search (case-insensitive substring over name, phone, comment).
    // A request matches if ANY of the three fields contains the query;
    // the comment is only consulted when present.
    if !text_lower.is_empty() {
        let name_hit = request.full_name.to_lowercase().contains(text_lower);
        let phone_hit = request.phone.to_lowercase().contains(text_lower);
        let comment_hit = request
            .comment
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(text_lower));
        if !(name_hit || phone_hit || comment_hit) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Priority;
    use chrono::{Local, TimeZone};

    fn make_request(id: &str, status: RequestStatus, name: &str, phone: &str) -> Request {
        Request {
            id: id.to_string(),
            full_name: name.to_string(),
            phone: phone.to_string(),
            birth_date: None,
            status,
            source: String::new(),
            comment: None,
            tags: Vec::new(),
            assigned_to: None,
            priority: Priority::Medium,
            referrer: None,
            user_agent: None,
            created_at: Local.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let requests = vec![
            make_request("1", RequestStatus::New, "Ivanov", "111"),
            make_request("2", RequestStatus::Accepted, "Petrov", "222"),
        ];
        let result = apply_filters(&requests, &RequestFilter::default(), today());
        assert_eq!(result, vec![0, 1]);
    }

    #[test]
    fn test_whitespace_query_is_identity() {
        let requests = vec![make_request("1", RequestStatus::New, "Ivanov", "111")];
        let filter = RequestFilter {
            text_query: "   ".to_string(),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(apply_filters(&requests, &filter, today()), vec![0]);
    }

    #[test]
    fn test_status_filter() {
        let requests = vec![
            make_request("1", RequestStatus::New, "Ivanov", "111"),
            make_request("2", RequestStatus::Accepted, "Petrov", "222"),
            make_request("3", RequestStatus::New, "Sidorov", "333"),
        ];
        let filter = RequestFilter {
            status: StatusFilter::Only(RequestStatus::New),
            ..Default::default()
        };
        assert_eq!(apply_filters(&requests, &filter, today()), vec![0, 2]);
    }

    #[test]
    fn test_text_search_case_insensitive() {
        let requests = vec![
            make_request("1", RequestStatus::New, "IVANOV Ivan", "111"),
            make_request("2", RequestStatus::New, "Petrov", "222"),
        ];
        let filter = RequestFilter {
            text_query: "ivanov".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&requests, &filter, today()), vec![0]);
    }

    #[test]
    fn test_text_search_matches_phone() {
        // Three requests created today; phone query "22" selects exactly
        // the accepted one.
        let requests = vec![
            make_request("1", RequestStatus::New, "A", "111"),
            make_request("2", RequestStatus::Accepted, "B", "222"),
            make_request("3", RequestStatus::Rejected, "C", "333"),
        ];
        let filter = RequestFilter {
            text_query: "22".to_string(),
            ..Default::default()
        };
        let result = apply_filters(&requests, &filter, today());
        assert_eq!(result, vec![1]);
        assert_eq!(requests[result[0]].status, RequestStatus::Accepted);
    }

    #[test]
    fn test_text_search_matches_comment_when_present() {
        let mut with_comment = make_request("1", RequestStatus::New, "A", "111");
        with_comment.comment = Some("Call after 18:00".to_string());
        let requests = vec![
            with_comment,
            make_request("2", RequestStatus::New, "B", "222"),
        ];
        let filter = RequestFilter {
            text_query: "after 18".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&requests, &filter, today()), vec![0]);
    }

    #[test]
    fn test_today_window() {
        let mut yesterday = make_request("1", RequestStatus::New, "A", "111");
        yesterday.created_at = Local.with_ymd_and_hms(2026, 8, 29, 23, 59, 59).unwrap();
        let requests = vec![
            yesterday,
            make_request("2", RequestStatus::New, "B", "222"),
        ];
        let filter = RequestFilter {
            date_window: DateWindow::Today,
            ..Default::default()
        };
        assert_eq!(apply_filters(&requests, &filter, today()), vec![1]);
    }

    #[test]
    fn test_week_window_is_trailing_seven_days() {
        let t = today();
        // Inclusive lower bound is today - 6.
        assert!(DateWindow::Week.contains(t, t));
        assert!(DateWindow::Week.contains(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(), t));
        assert!(!DateWindow::Week.contains(NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(), t));
    }

    #[test]
    fn test_month_window_calendar_subtraction() {
        let t = today();
        assert!(DateWindow::Month.contains(NaiveDate::from_ymd_opt(2026, 7, 30).unwrap(), t));
        assert!(!DateWindow::Month.contains(NaiveDate::from_ymd_opt(2026, 7, 29).unwrap(), t));
    }

    #[test]
    fn test_month_window_clamps_to_month_end() {
        // 31 March - 1 month clamps to 28 February (2026 is not a leap year).
        let t = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert!(DateWindow::Month.contains(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(), t));
        assert!(!DateWindow::Month.contains(NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(), t));
    }

    #[test]
    fn test_combined_filters() {
        let mut old_new = make_request("1", RequestStatus::New, "Ivanov", "111");
        old_new.created_at = Local.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap();
        let requests = vec![
            old_new,
            make_request("2", RequestStatus::New, "Ivanov", "222"),
            make_request("3", RequestStatus::Rejected, "Ivanov", "333"),
        ];
        let filter = RequestFilter {
            text_query: "ivanov".to_string(),
            status: StatusFilter::Only(RequestStatus::New),
            date_window: DateWindow::Today,
        };
        assert_eq!(apply_filters(&requests, &filter, today()), vec![1]);
    }

    #[test]
    fn test_result_is_stable_subsequence() {
        let requests: Vec<Request> = (0..10)
            .map(|i| make_request(&i.to_string(), RequestStatus::New, "X", &format!("{i}{i}")))
            .collect();
        let filter = RequestFilter {
            text_query: "x".to_string(),
            ..Default::default()
        };
        let result = apply_filters(&requests, &filter, today());
        let mut sorted = result.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(result, sorted, "indices must be strictly increasing");
    }
}
