use chrono::{NaiveDate, NaiveDateTime};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parses the date shapes SAP emits (`2024-03-18`, raw DATS `20240318`, or a
/// full timestamp) into a local midnight-based timestamp.
pub fn parse_sap_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    ["%Y-%m-%d", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Whole days between two instants, rounded up, direction ignored.
pub fn days_between_ceil(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    let millis = (a - b).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn parses_iso_and_dats_dates() {
        assert_eq!(parse_sap_date("2024-03-18"), Some(at(2024, 3, 18, 0)));
        assert_eq!(parse_sap_date("20240318"), Some(at(2024, 3, 18, 0)));
        assert_eq!(parse_sap_date("2024-03-18T09:00:00"), Some(at(2024, 3, 18, 9)));
    }

    #[test]
    fn rejects_empty_and_initial_dates() {
        assert_eq!(parse_sap_date(""), None);
        assert_eq!(parse_sap_date("0000-00-00"), None);
        assert_eq!(parse_sap_date("00000000"), None);
    }

    #[test]
    fn rounds_partial_days_up() {
        assert_eq!(days_between_ceil(at(2024, 3, 21, 0), at(2024, 3, 18, 0)), 3);
        assert_eq!(days_between_ceil(at(2024, 3, 21, 1), at(2024, 3, 18, 0)), 4);
        assert_eq!(days_between_ceil(at(2024, 3, 18, 0), at(2024, 3, 21, 0)), 3);
        assert_eq!(days_between_ceil(at(2024, 3, 18, 0), at(2024, 3, 18, 0)), 0);
    }
}
