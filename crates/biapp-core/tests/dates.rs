use biapp_core::dates::{days_before, display_date, month_day_label, parse_api_date, years_before};
use biapp_core::models::dashboard::{AgeBand, DashboardFilters, DashboardRange};
use biapp_core::models::patient::Sex;
use jiff::civil::date;

#[test]
fn api_dates_keep_only_the_date_part() {
    assert_eq!(
        parse_api_date("2025-01-31T15:20:00.000000Z"),
        Some(date(2025, 1, 31))
    );
    assert_eq!(parse_api_date("2025-01-31"), Some(date(2025, 1, 31)));
    assert_eq!(parse_api_date("31/01/2025"), None);
    assert_eq!(parse_api_date(""), None);
}

#[test]
fn labels_and_display() {
    assert_eq!(month_day_label("2025-07-04T00:00:00Z"), "07-04");
    assert_eq!(month_day_label("not a date"), "");
    assert_eq!(display_date("2025-07-04 10:00:00"), "2025-07-04");
    assert_eq!(display_date("garbage"), "garbage");
}

#[test]
fn date_arithmetic_clamps() {
    assert_eq!(days_before(date(2025, 3, 1), 30), date(2025, 1, 30));
    assert_eq!(years_before(date(2025, 6, 15), 120), date(1905, 6, 15));
}

#[test]
fn dashboard_query_for_window_and_filters() {
    let filters = DashboardFilters {
        range: DashboardRange::Days(30),
        sex: Some(Sex::F),
        has_disease: Some(false),
        age: Some("18-39".parse::<AgeBand>().unwrap()),
    };

    let pairs = filters.query_pairs(date(2025, 3, 31));
    assert_eq!(
        pairs,
        vec![
            ("from", "2025-03-01".to_string()),
            ("to", "2025-03-31".to_string()),
            ("sex", "F".to_string()),
            ("has_disease", "0".to_string()),
            ("min_age", "18".to_string()),
            ("max_age", "39".to_string()),
        ]
    );
}

#[test]
fn dashboard_all_time_has_no_dates() {
    let filters = DashboardFilters::default();
    assert!(filters.query_pairs(date(2025, 3, 31)).is_empty());
    assert_eq!("all".parse::<DashboardRange>(), Ok(DashboardRange::All));
    assert_eq!("90".parse::<DashboardRange>(), Ok(DashboardRange::Days(90)));
    assert!("soon".parse::<DashboardRange>().is_err());
    assert!("40-18".parse::<AgeBand>().is_err());
}
