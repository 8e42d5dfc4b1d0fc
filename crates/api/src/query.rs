//! Shared query parameter types for API handlers.
//!
//! The dashboard and single-widget endpoints accept the same global filters;
//! they are collected here so both parse and validate them identically.

use bizdash_core::error::CoreError;
use bizdash_core::types::Date;
use bizdash_widgets::GlobalFilters;
use serde::Deserialize;

/// Global filter parameters (`?from=&to=&ownerId=`) plus the reference date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub owner_id: Option<String>,
    /// Reference date for relative computations. Defaults to the server's
    /// local date.
    pub today: Option<Date>,
}

impl FilterParams {
    /// Validate the range and split into filters and reference date.
    pub fn resolve(&self) -> Result<(GlobalFilters, Date), CoreError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(CoreError::Validation(format!(
                    "Filter range is inverted: {from} is after {to}"
                )));
            }
        }
        let filters = GlobalFilters {
            from: self.from,
            to: self.to,
            owner_id: self
                .owner_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        Ok((filters, self.today.unwrap_or_else(local_today)))
    }
}

/// The server's current local date.
pub fn local_today() -> Date {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let params = FilterParams {
            from: Some(d(2026, 3, 1)),
            to: Some(d(2026, 2, 1)),
            ..Default::default()
        };
        assert_matches!(params.resolve(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_owner_is_dropped() {
        let params = FilterParams {
            owner_id: Some("  ".into()),
            today: Some(d(2026, 5, 4)),
            ..Default::default()
        };
        let (filters, today) = params.resolve().unwrap();
        assert_eq!(filters, GlobalFilters::default());
        assert_eq!(today, d(2026, 5, 4));
    }
}
