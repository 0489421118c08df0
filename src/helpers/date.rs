//! Date helper functions

use chrono::NaiveDate;

/// Format a date using a chrono format string
pub fn format_date(date: &NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Format a date for sitemap / machine consumption
pub fn date_xml(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2014, 5, 1).unwrap();
        assert_eq!(format_date(&date, "%Y-%m-%d"), "2014-05-01");
        assert_eq!(format_date(&date, "%B %Y"), "May 2014");
    }

    #[test]
    fn test_date_xml() {
        let date = NaiveDate::from_ymd_opt(2014, 5, 1).unwrap();
        assert_eq!(date_xml(&date), "2014-05-01");
    }
}
