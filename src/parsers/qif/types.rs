use crate::errors::ConvertError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day/month ordering of dates in a QIF export.
///
/// The QIF date field is ambiguous across institutions (`02/01/2024` can be
/// January 2nd or February 1st), so the ordering is configured per invocation
/// and never guessed from content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "day-first")]
    DayFirst,
    #[serde(rename = "month-first")]
    MonthFirst,
}

impl DateFormat {
    // Two-digit year patterns come first: %Y would otherwise swallow "24" as
    // the literal year 24.
    fn patterns(self) -> &'static [&'static str] {
        match self {
            DateFormat::DayFirst => &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y"],
            DateFormat::MonthFirst => &["%m/%d/%y", "%m/%d/%Y", "%m-%d-%Y"],
        }
    }

    /// Parse a raw QIF date field with this ordering.
    pub fn parse(self, raw: &str) -> Result<NaiveDate, ConvertError> {
        // Quicken writes two-digit years after an apostrophe, e.g. 1/31'05
        let clean = raw.trim().replace('\'', "/");

        for pattern in self.patterns() {
            if let Ok(date) = NaiveDate::parse_from_str(&clean, pattern) {
                return Ok(date);
            }
        }
        Err(ConvertError::QifDateInvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DateFormat::DayFirst, "02/01/2024", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())]
    #[case(DateFormat::MonthFirst, "02/01/2024", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())]
    #[case(DateFormat::DayFirst, "31/12/24", NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())]
    #[case(DateFormat::MonthFirst, "12/31/24", NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())]
    #[case(DateFormat::MonthFirst, "1/31'05", NaiveDate::from_ymd_opt(2005, 1, 31).unwrap())]
    #[case(DateFormat::DayFirst, "05-03-2024", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())]
    #[case(DateFormat::DayFirst, " 02/01/2024 ", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())]
    fn test_parse_qif_date(
        #[case] format: DateFormat,
        #[case] raw: &str,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(format.parse(raw).unwrap(), expected);
    }

    #[rstest]
    #[case(DateFormat::DayFirst, "")]
    #[case(DateFormat::DayFirst, "not a date")]
    #[case(DateFormat::DayFirst, "32/01/2024")] // no 32nd day
    #[case(DateFormat::MonthFirst, "13/32/2024")] // no 13th month
    #[case(DateFormat::DayFirst, "2024")]
    fn test_parse_qif_date_invalid(#[case] format: DateFormat, #[case] raw: &str) {
        let result = format.parse(raw);
        assert!(matches!(result, Err(ConvertError::QifDateInvalidFormat)));
    }

    #[test]
    fn test_default_is_day_first() {
        assert_eq!(DateFormat::default(), DateFormat::DayFirst);
    }
}
