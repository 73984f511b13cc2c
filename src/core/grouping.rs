// LeadDesk - core/grouping.rs
//
// Calendar-day grouping of new requests for the inbox view.
// Core layer: pure logic, no I/O or store dependencies.

use crate::core::model::{Request, RequestStatus};
use crate::util::constants::DATE_FORMAT;
use chrono::{Days, NaiveDate};

/// One calendar day's worth of new requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    /// The local calendar day all member requests were created on.
    pub day: NaiveDate,

    /// Header label: "Today", "Yesterday", or the calendar date.
    pub label: String,

    /// Indices into the source slice, in source order.
    pub indices: Vec<usize>,
}

/// Group requests by the local calendar day of `created_at`, most recent
/// day first.
///
/// Fixed business rule: only `New` requests participate — the inbox shows
/// work still to be done, handled requests live in the filtered list view.
/// Within a group the source-collection order is preserved. Empty input
/// (or input with no new requests) produces an empty vec.
pub fn group_by_day(requests: &[Request], today: NaiveDate) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for (idx, request) in requests.iter().enumerate() {
        if request.status != RequestStatus::New {
            continue;
        }
        let day = request.created_at.date_naive();

        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.indices.push(idx),
            None => groups.push(DayGroup {
                day,
                label: day_label(day, today),
                indices: vec![idx],
            }),
        }
    }

    // Most recent day first. Day keys are distinct (each is inserted
    // exactly once above), so the sort order is total.
    groups.sort_by(|a, b| b.day.cmp(&a.day));
    groups
}

/// Header label for a group day: "Today", "Yesterday", or `dd.MM.yyyy`.
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    let yesterday = today.checked_sub_days(Days::new(1));
    if day == today {
        "Today".to_string()
    } else if Some(day) == yesterday {
        "Yesterday".to_string()
    } else {
        day.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Priority;
    use chrono::{Local, TimeZone};

    fn make_request(id: &str, status: RequestStatus, day: u32, hour: u32) -> Request {
        Request {
            id: id.to_string(),
            full_name: format!("Customer {id}"),
            phone: String::new(),
            birth_date: None,
            status,
            source: String::new(),
            comment: None,
            tags: Vec::new(),
            assigned_to: None,
            priority: Priority::Medium,
            referrer: None,
            user_agent: None,
            created_at: Local.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(group_by_day(&[], today()).is_empty());
    }

    #[test]
    fn test_only_new_requests_grouped() {
        let requests = vec![
            make_request("1", RequestStatus::New, 30, 9),
            make_request("2", RequestStatus::Accepted, 30, 10),
            make_request("3", RequestStatus::Rejected, 29, 11),
        ];
        let groups = group_by_day(&requests, today());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].indices, vec![0]);
    }

    #[test]
    fn test_groups_descending_by_day() {
        let requests = vec![
            make_request("1", RequestStatus::New, 28, 9),
            make_request("2", RequestStatus::New, 30, 10),
            make_request("3", RequestStatus::New, 29, 11),
        ];
        let groups = group_by_day(&requests, today());
        let days: Vec<u32> = groups.iter().map(|g| chrono::Datelike::day(&g.day)).collect();
        assert_eq!(days, vec![30, 29, 28]);
    }

    #[test]
    fn test_within_group_insertion_order() {
        let requests = vec![
            make_request("1", RequestStatus::New, 30, 18),
            make_request("2", RequestStatus::New, 30, 8),
            make_request("3", RequestStatus::New, 30, 12),
        ];
        let groups = group_by_day(&requests, today());
        assert_eq!(groups.len(), 1);
        // Source order, not time-of-day order.
        assert_eq!(groups[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_exact_partition_of_new_subset() {
        let requests = vec![
            make_request("1", RequestStatus::New, 30, 9),
            make_request("2", RequestStatus::New, 29, 9),
            make_request("3", RequestStatus::Accepted, 29, 9),
            make_request("4", RequestStatus::New, 28, 9),
            make_request("5", RequestStatus::New, 30, 20),
        ];
        let groups = group_by_day(&requests, today());

        // Every new request appears exactly once across all groups.
        let mut seen: Vec<usize> = groups.iter().flat_map(|g| g.indices.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 3, 4]);

        // Group days are distinct and strictly descending.
        for pair in groups.windows(2) {
            assert!(pair[0].day > pair[1].day);
        }
    }

    #[test]
    fn test_labels() {
        let requests = vec![
            make_request("1", RequestStatus::New, 30, 9),
            make_request("2", RequestStatus::New, 29, 9),
            make_request("3", RequestStatus::New, 15, 9),
        ];
        let groups = group_by_day(&requests, today());
        assert_eq!(groups[0].label, "Today");
        assert_eq!(groups[1].label, "Yesterday");
        assert_eq!(groups[2].label, "15.08.2026");
    }
}
