//! Date normalization to the QIF `MM/DD/YYYY` form

use chrono::NaiveDate;

use crate::error::DateFormatError;

/// Accepted input patterns, tried in order. The separator and the position
/// of the year segment are used to require a four-digit year, since chrono's
/// `%Y` would otherwise accept short years.
const DATE_FORMATS: [(&str, char, usize); 5] = [
    ("%Y-%m-%d", '-', 0), // 2024-01-15
    ("%m/%d/%Y", '/', 2), // 01/15/2024
    ("%d/%m/%Y", '/', 2), // 15/01/2024 (European)
    ("%Y/%m/%d", '/', 0), // 2024/01/15
    ("%d-%m-%Y", '-', 2), // 15-01-2024
];

/// Output pattern for QIF `D` lines
pub const QIF_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse a date in any accepted pattern.
///
/// Ambiguous dates resolve to the first matching pattern, so `01/02/2024`
/// is always January 2nd.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateFormatError> {
    let trimmed = s.trim();

    for (fmt, sep, year_pos) in DATE_FORMATS {
        if !has_four_digit_year(trimmed, sep, year_pos) {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }

    Err(DateFormatError(s.to_string()))
}

/// Normalize a date string to `MM/DD/YYYY`
pub fn normalize_date(s: &str) -> Result<String, DateFormatError> {
    parse_date(s).map(|date| date.format(QIF_DATE_FORMAT).to_string())
}

fn has_four_digit_year(s: &str, sep: char, year_pos: usize) -> bool {
    let parts: Vec<&str> = s.split(sep).collect();
    parts.len() == 3
        && parts[year_pos].len() == 4
        && parts[year_pos].bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_agree() {
        for input in [
            "2024-01-15",
            "01/15/2024",
            "15/01/2024",
            "2024/01/15",
            "15-01-2024",
        ] {
            assert_eq!(normalize_date(input).unwrap(), "01/15/2024", "input {input}");
        }
    }

    #[test]
    fn test_ambiguous_date_prefers_month_first() {
        assert_eq!(normalize_date("01/02/2024").unwrap(), "01/02/2024");
        assert_eq!(normalize_date("13/02/2024").unwrap(), "02/13/2024");
    }

    #[test]
    fn test_invalid_date() {
        let err = normalize_date("invalid").unwrap_err();
        assert_eq!(err, DateFormatError("invalid".to_string()));
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(normalize_date("2024-02-30").is_err());
        assert!(normalize_date("13/13/2024").is_err());
        assert!(normalize_date("").is_err());
    }

    #[test]
    fn test_rejects_short_years() {
        assert!(normalize_date("01/15/24").is_err());
        assert!(normalize_date("24-01-15").is_err());
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize_date("  2024-12-31 ").unwrap(), "12/31/2024");
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(normalize_date("29-02-2024").unwrap(), "02/29/2024");
        assert!(normalize_date("29-02-2023").is_err());
    }
}
