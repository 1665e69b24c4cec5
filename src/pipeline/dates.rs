use chrono::{Datelike, NaiveDate};

/// Accepted prescription date formats, tried in priority order.
/// Four-digit years first, then the two-digit fallbacks.
const DATE_FORMATS: &[(&str, YearDigits)] = &[
    ("%d/%m/%Y", YearDigits::Four),
    ("%d-%m-%Y", YearDigits::Four),
    ("%d/%m/%y", YearDigits::Two),
    ("%d-%m-%y", YearDigits::Two),
];

#[derive(PartialEq)]
enum YearDigits {
    Four,
    Two,
}

/// Interpret the free-form date string from a structured draft.
///
/// Pure: returns None for blank input or when no format matches. Never
/// guesses a default date.
pub fn resolve_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|(fmt, digits)| {
        let date = NaiveDate::parse_from_str(raw, fmt).ok()?;
        // chrono's %Y also matches short years; keep the four-digit formats
        // strict so "05-03-24" falls through to the %y fallback.
        if *digits == YearDigits::Four && date.year() < 1000 {
            return None;
        }
        Some(date)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_format_slash_four_digit_year() {
        let date = resolve_date("05/03/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn hyphen_four_digit_year() {
        let date = resolve_date("28-12-2023").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 28).unwrap());
    }

    #[test]
    fn two_digit_year_fallbacks() {
        assert_eq!(
            resolve_date("05/03/24").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(
            resolve_date("05-03-24").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn two_digit_year_before_sixty_nine_is_two_thousands() {
        assert_eq!(
            resolve_date("01-01-30").unwrap(),
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
        );
    }

    #[test]
    fn day_month_ordering_not_month_day() {
        let date = resolve_date("02/01/2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn unparseable_input_is_unresolved() {
        assert!(resolve_date("not a date").is_none());
        assert!(resolve_date("2024/03/05").is_none());
        assert!(resolve_date("32/01/2024").is_none());
        assert!(resolve_date("05.03.2024").is_none());
    }

    #[test]
    fn blank_input_is_unresolved() {
        assert!(resolve_date("").is_none());
        assert!(resolve_date("   ").is_none());
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert!(resolve_date(" 05/03/2024 ").is_some());
    }
}
