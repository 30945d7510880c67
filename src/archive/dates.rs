//! Date-to-folder resolution for the `YYYY_MM_DD` archive layout.
//!
//! The importer names each folder after the capture date with
//! `strftime`-style `%Y_%m_%d` encoding. This module maps a target date onto
//! the folders that would hold the same month/day in prior years.

use chrono::{Datelike, NaiveDate};

/// Encode a date as the archive folder name, e.g. `2023_07_05`.
pub fn folder_name(date: NaiveDate) -> String {
    date.format("%Y_%m_%d").to_string()
}

/// Human-readable rendering of a date for pages and API payloads,
/// e.g. `July 15, 2024`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// The `(year, folder_name)` candidates for the same month/day in prior
/// years, nearest year first.
///
/// Projections that do not exist in a given year (Feb 29 outside leap years)
/// are skipped rather than reported as errors.
pub fn historical_folders(target: NaiveDate, lookback_years: u32) -> Vec<(i32, String)> {
    (1..=lookback_years as i32)
        .filter_map(|k| {
            let year = target.year() - k;
            NaiveDate::from_ymd_opt(year, target.month(), target.day())
                .map(|date| (year, folder_name(date)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_folder_name_zero_pads() {
        assert_eq!(folder_name(date(2023, 7, 5)), "2023_07_05");
        assert_eq!(folder_name(date(2019, 12, 31)), "2019_12_31");
    }

    #[test]
    fn test_display_date_is_unpadded() {
        assert_eq!(display_date(date(2024, 7, 5)), "July 5, 2024");
    }

    #[test]
    fn test_historical_folders_nearest_first() {
        let candidates = historical_folders(date(2024, 7, 15), 3);
        assert_eq!(
            candidates,
            vec![
                (2023, "2023_07_15".to_string()),
                (2022, "2022_07_15".to_string()),
                (2021, "2021_07_15".to_string()),
            ]
        );
    }

    #[test]
    fn test_historical_folders_probes_exactly_lookback_years() {
        let candidates = historical_folders(date(2024, 3, 1), 10);
        assert_eq!(candidates.len(), 10);
        assert_eq!(candidates.first().unwrap().0, 2023);
        assert_eq!(candidates.last().unwrap().0, 2014);
    }

    #[test]
    fn test_historical_folders_skips_invalid_leap_projections() {
        // Feb 29 only exists in 2020 and 2016 within 8 years of 2024.
        let candidates = historical_folders(date(2024, 2, 29), 8);
        let years: Vec<i32> = candidates.iter().map(|(year, _)| *year).collect();
        assert_eq!(years, vec![2020, 2016]);
        assert_eq!(candidates[0].1, "2020_02_29");
    }

    #[test]
    fn test_historical_folders_zero_lookback_is_empty() {
        assert!(historical_folders(date(2024, 7, 15), 0).is_empty());
    }
}
