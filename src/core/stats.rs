// LeadDesk - core/stats.rs
//
// Read-only statistics snapshot over a request collection: totals,
// acceptance/rejection rates, period breakdowns, hourly distribution,
// and a daily time series for charting.
// Core layer: pure logic, recomputed from scratch on demand.

use crate::core::filter::DateWindow;
use crate::core::model::{Request, RequestStatus};
use crate::util::constants::{
    AVG_DAILY_DIVISOR, AVG_WEEKLY_DIVISOR, DAILY_CHART_DAYS, HOURS_PER_DAY,
};
use chrono::{Days, NaiveDate, Timelike};

/// Counts and rates across the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalStats {
    /// Collection size.
    pub all: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub new: usize,

    /// round(100 * accepted / all), 0 when the collection is empty.
    pub acceptance_rate: u32,

    /// round(100 * rejected / all), 0 when the collection is empty.
    pub rejection_rate: u32,
}

/// Status breakdown within one date window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodStats {
    /// All requests inside the window, regardless of status.
    pub count: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub new: usize,
}

/// One hour-of-day bucket in the hourly distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourCount {
    /// Hour of day, 0..=23.
    pub hour: u32,
    pub count: usize,
}

/// One calendar day in the daily time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Complete statistics snapshot.
///
/// Produced by [`compute_statistics`]; never mutated in place. Callers
/// recompute after every upstream data change — the computation is a
/// single pass over the collection and cheap enough to re-run
/// unconditionally on each store notification.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub total: TotalStats,
    pub today: PeriodStats,
    pub this_week: PeriodStats,
    pub this_month: PeriodStats,

    /// Dense hourly distribution: exactly 24 entries, zero hours included,
    /// so peak detection always has a well-defined domain.
    pub hourly: [HourCount; HOURS_PER_DAY],

    /// Ascending continuous daily series from
    /// min(earliest observed day, today - (chart span - 1)) through
    /// max(latest observed day, today), zero-filled for empty days.
    /// The trailing `chart span` entries therefore always exist for the
    /// chart, whatever span the computation was given.
    pub daily: Vec<DayCount>,
}

impl Statistics {
    /// The hourly bucket with the maximum count. Ties are broken by the
    /// earliest hour: the scan only replaces the running maximum on a
    /// strictly greater count.
    pub fn peak_hour(&self) -> &HourCount {
        let mut peak = &self.hourly[0];
        for bucket in &self.hourly[1..] {
            if bucket.count > peak.count {
                peak = bucket;
            }
        }
        peak
    }

    /// Average requests per day, quoted against a fixed 30-day month.
    pub fn average_per_day(&self) -> usize {
        (self.this_month.count as f64 / AVG_DAILY_DIVISOR).round() as usize
    }

    /// Average requests per week, quoted against a fixed 7-day divisor.
    pub fn average_per_week(&self) -> usize {
        (self.this_week.count as f64 / AVG_WEEKLY_DIVISOR).round() as usize
    }

    /// The trailing seven entries of the daily series (default chart view).
    pub fn last_7_days(&self) -> &[DayCount] {
        self.last_n_days(DAILY_CHART_DAYS)
    }

    /// The trailing `n` entries of the daily series. The series always
    /// holds at least the chart span the statistics were computed with;
    /// an `n` beyond that returns whatever the series holds.
    pub fn last_n_days(&self, n: usize) -> &[DayCount] {
        let start = self.daily.len().saturating_sub(n);
        &self.daily[start..]
    }
}

/// Compute the full statistics snapshot for a request collection,
/// relative to `today` (the current local calendar day), with the
/// default chart span.
///
/// Pure function of its inputs; the collection is never mutated.
pub fn compute_statistics(requests: &[Request], today: NaiveDate) -> Statistics {
    compute_statistics_spanning(requests, today, DAILY_CHART_DAYS)
}

/// [`compute_statistics`] with an explicit daily chart span: the daily
/// series materialises at least `chart_days` trailing entries, so a
/// configured chart never renders short.
pub fn compute_statistics_spanning(
    requests: &[Request],
    today: NaiveDate,
    chart_days: usize,
) -> Statistics {
    let mut total = TotalStats {
        all: requests.len(),
        ..Default::default()
    };
    let mut today_stats = PeriodStats::default();
    let mut week_stats = PeriodStats::default();
    let mut month_stats = PeriodStats::default();

    let mut hourly = [HourCount::default(); HOURS_PER_DAY];
    for (hour, bucket) in hourly.iter_mut().enumerate() {
        bucket.hour = hour as u32;
    }

    for request in requests {
        match request.status {
            RequestStatus::Accepted => total.accepted += 1,
            RequestStatus::Rejected => total.rejected += 1,
            RequestStatus::New => total.new += 1,
            RequestStatus::NoAnswer => {}
        }

        let day = request.created_at.date_naive();
        if DateWindow::Today.contains(day, today) {
            tally_period(&mut today_stats, request.status);
        }
        if DateWindow::Week.contains(day, today) {
            tally_period(&mut week_stats, request.status);
        }
        if DateWindow::Month.contains(day, today) {
            tally_period(&mut month_stats, request.status);
        }

        let hour = request.created_at.hour() as usize;
        // hour() is 0..=23 by construction; the modulo keeps the index in
        // bounds even if that contract ever changes.
        hourly[hour % HOURS_PER_DAY].count += 1;
    }

    total.acceptance_rate = rate(total.accepted, total.all);
    total.rejection_rate = rate(total.rejected, total.all);

    Statistics {
        total,
        today: today_stats,
        this_week: week_stats,
        this_month: month_stats,
        hourly,
        daily: daily_series(requests, today, chart_days),
    }
}

/// Count a request into one period bucket.
fn tally_period(period: &mut PeriodStats, status: RequestStatus) {
    period.count += 1;
    match status {
        RequestStatus::Accepted => period.accepted += 1,
        RequestStatus::Rejected => period.rejected += 1,
        RequestStatus::New => period.new += 1,
        RequestStatus::NoAnswer => {}
    }
}

/// Rounded percentage; 0 when the denominator is 0.
fn rate(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

/// Build the ascending zero-filled daily series.
///
/// The span always reaches back at least `chart_days` days so the
/// chart never runs short, and extends forward past today if the data
/// contains future-dated requests (clock skew on the submitting side).
fn daily_series(requests: &[Request], today: NaiveDate, chart_days: usize) -> Vec<DayCount> {
    let chart_floor = today
        .checked_sub_days(Days::new(chart_days.max(1) as u64 - 1))
        .unwrap_or(NaiveDate::MIN);

    let observed_days: Vec<NaiveDate> = requests
        .iter()
        .map(|r| r.created_at.date_naive())
        .collect();

    let start = observed_days
        .iter()
        .min()
        .map_or(chart_floor, |earliest| (*earliest).min(chart_floor));
    let end = observed_days
        .iter()
        .max()
        .map_or(today, |latest| (*latest).max(today));

    let mut series: Vec<DayCount> = Vec::new();
    let mut day = start;
    while day <= end {
        let count = observed_days.iter().filter(|d| **d == day).count();
        series.push(DayCount { date: day, count });
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    series
}
