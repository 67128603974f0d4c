use chrono::NaiveDate;
use ob_gateway_core::domain::frequency::{Frequency, next_occurrence};
use ob_gateway_core::error::GatewayError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_reference_cases() {
    let reference = date(2021, 2, 6);
    let cases = [
        ("EvryDay", date(2021, 2, 7)),
        ("EvryWorkgDay", date(2021, 2, 8)),
        ("IntrvlWkDay:01:07", date(2021, 2, 14)),
        ("IntrvlMnthDay:01:30", date(2021, 3, 30)),
        ("QtrDay:ENGLISH", date(2021, 3, 25)),
    ];
    for (descriptor, expected) in cases {
        assert_eq!(
            next_occurrence(descriptor, reference).unwrap(),
            expected,
            "descriptor {descriptor}"
        );
    }

    assert!(matches!(
        next_occurrence("IntrvlDay:01", reference),
        Err(GatewayError::InvalidFrequencyFormat { .. })
    ));
}

#[test]
fn test_long_and_code_forms_agree() {
    let reference = date(2021, 2, 6);
    for (code, long) in [
        ("EvryDay", "EveryDay"),
        ("EvryWorkgDay", "EveryWorkingDay"),
        ("IntrvlWkDay:02:03", "IntervalWeekDay:02:03"),
        ("WkInMnthDay:02:03", "WeekInMonthDay:02:03"),
        ("IntrvlMnthDay:06:-01", "IntervalMonthDay:06:-01"),
        ("QtrDay:SCOTTISH", "QuarterDay:SCOTTISH"),
        ("IntrvlDay:15", "IntervalDay:15"),
    ] {
        assert_eq!(
            next_occurrence(code, reference).unwrap(),
            next_occurrence(long, reference).unwrap(),
            "{code} vs {long}"
        );
    }
}

#[test]
fn test_month_end_schedule() {
    let frequency: Frequency = "IntrvlMnthDay:01:-01".parse().unwrap();
    let dates = frequency.schedule(date(2024, 1, 15), 4).unwrap();
    assert_eq!(
        dates,
        vec![
            date(2024, 2, 29),
            date(2024, 3, 31),
            date(2024, 4, 30),
            date(2024, 5, 31)
        ]
    );
}

#[test]
fn test_unknown_type_names_the_tag() {
    match next_occurrence("Fortnightly:02", date(2021, 2, 6)) {
        Err(GatewayError::UnknownFrequencyType(tag)) => assert_eq!(tag, "Fortnightly"),
        other => panic!("unexpected result: {other:?}"),
    }
}
