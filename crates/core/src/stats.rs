//! Derived statistics for dashboard widgets: deltas, month buckets and
//! top-N breakdowns. Pure functions over already-fetched records.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Percentage change from `previous` to `current`.
///
/// Returns `0.0` whenever `previous` is not strictly positive, so the result
/// is never NaN or infinite.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Round to `decimals` places for display payloads.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Share of `part` in `total` as a percentage, `0.0` for an empty total.
pub fn ratio_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Months
// ---------------------------------------------------------------------------

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// `"YYYY-MM"` bucket key.
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// The `count` months ending with the month of `today`, oldest first.
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count as usize);
    let mut cursor = YearMonth::of(today);
    for _ in 0..count {
        months.push(cursor);
        cursor = cursor.previous();
    }
    months.reverse();
    months
}

/// Sum `(date, amount)` pairs into the given month buckets. Dates outside
/// every bucket are ignored.
pub fn sum_by_month<I>(months: &[YearMonth], records: I) -> Vec<f64>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let index: HashMap<YearMonth, usize> =
        months.iter().enumerate().map(|(i, m)| (*m, i)).collect();
    let mut totals = vec![0.0; months.len()];
    for (date, amount) in records {
        if let Some(&i) = index.get(&YearMonth::of(date)) {
            totals[i] += amount;
        }
    }
    totals
}

/// Current-month vs previous-month comparison of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthOverMonth {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
}

impl MonthOverMonth {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            change: round_to(percentage_change(current, previous), 1),
        }
    }

    /// Compare the amounts dated in `today`'s month with the month before.
    pub fn from_records<I>(today: NaiveDate, records: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let this_month = YearMonth::of(today);
        let last_month = this_month.previous();
        let (mut current, mut previous) = (0.0, 0.0);
        for (date, amount) in records {
            if this_month.contains(date) {
                current += amount;
            } else if last_month.contains(date) {
                previous += amount;
            }
        }
        Self::new(current, previous)
    }
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

/// Aggregate `(key, amount)` pairs, sort by amount descending (ties by key)
/// and keep the first `n`.
pub fn top_n<K, I>(records: I, n: usize) -> Vec<(K, f64)>
where
    K: Eq + Hash + Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut totals: HashMap<K, f64> = HashMap::new();
    for (key, amount) in records {
        *totals.entry(key).or_insert(0.0) += amount;
    }
    let mut sorted: Vec<(K, f64)> = totals.into_iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

/// Count occurrences per key, keeping first-seen order of `order`.
pub fn count_by<K, I>(order: &[K], keys: I) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, u64> = order.iter().map(|k| (k.clone(), 0)).collect();
    for key in keys {
        if let Some(count) = counts.get_mut(&key) {
            *count += 1;
        }
    }
    order
        .iter()
        .map(|k| (k.clone(), counts.get(k).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn zero_previous_means_zero_change() {
        for current in [0.0, 1.0, 1234.5, -10.0] {
            let change = percentage_change(current, 0.0);
            assert_eq!(change, 0.0);
            assert!(change.is_finite());
        }
        assert_eq!(percentage_change(5.0, -3.0), 0.0);
    }

    #[test]
    fn percentage_change_basic() {
        assert_eq!(percentage_change(150.0, 100.0), 50.0);
        assert_eq!(percentage_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(12.3456, 1), 12.3);
        assert_eq!(round_to(12.35, 0), 12.0);
    }

    #[test]
    fn ratio_of_empty_total_is_zero() {
        assert_eq!(ratio_pct(3.0, 0.0), 0.0);
        assert_eq!(ratio_pct(1.0, 4.0), 25.0);
    }

    #[test]
    fn trailing_months_cross_year_boundary() {
        let months = trailing_months(d(2026, 2, 10), 3);
        let keys: Vec<_> = months.iter().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["2025-12", "2026-01", "2026-02"]);
    }

    #[test]
    fn sums_bucket_by_month() {
        let months = trailing_months(d(2026, 3, 1), 2);
        let totals = sum_by_month(
            &months,
            vec![
                (d(2026, 2, 3), 10.0),
                (d(2026, 3, 20), 5.0),
                (d(2026, 3, 21), 7.5),
                (d(2025, 3, 21), 100.0),
            ],
        );
        assert_eq!(totals, vec![10.0, 12.5]);
    }

    #[test]
    fn month_over_month_from_records() {
        let mom = MonthOverMonth::from_records(
            d(2026, 1, 15),
            vec![
                (d(2026, 1, 2), 3.0),
                (d(2025, 12, 30), 2.0),
                (d(2025, 11, 30), 50.0),
            ],
        );
        assert_eq!(mom.current, 3.0);
        assert_eq!(mom.previous, 2.0);
        assert_eq!(mom.change, 50.0);
    }

    #[test]
    fn top_n_sorts_descending_and_truncates() {
        let top = top_n(
            vec![
                ("rent", 1000.0),
                ("software", 200.0),
                ("travel", 300.0),
                ("software", 250.0),
                ("meals", 10.0),
            ],
            3,
        );
        assert_eq!(top, vec![("rent", 1000.0), ("software", 450.0), ("travel", 300.0)]);
    }

    #[test]
    fn top_n_breaks_ties_by_key() {
        let top = top_n(vec![("b", 1.0), ("a", 1.0)], 5);
        assert_eq!(top, vec![("a", 1.0), ("b", 1.0)]);
    }

    #[test]
    fn count_by_keeps_declared_order_and_ignores_unknown() {
        let counts = count_by(&["todo", "done"], vec!["done", "todo", "done", "other"]);
        assert_eq!(counts, vec![("todo", 1), ("done", 2)]);
    }
}
