//! `YYYY-MM-DD` date parsing/formatting shared by the API layer.
//!
//! Dates cross the HTTP boundary as plain ISO strings; rows keep
//! `time::Date`. Parsing failures surface as `ApiError::Validation`.

use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::ApiError;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, DATE_FORMAT)
        .map_err(|_| ApiError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

pub fn format_date(d: Date) -> String {
    d.format(DATE_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_and_format_roundtrip() {
        let d = parse_date("2024-03-07").expect("valid date");
        assert_eq!(d, date!(2024 - 03 - 07));
        assert_eq!(format_date(d), "2024-03-07");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("07/03/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }
}
